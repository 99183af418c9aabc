use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub smtp: SmtpConfig,
    pub recipient_email: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub tls: SmtpTls,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS.
    StartTls,
    /// Implicit TLS from the first byte (usually port 465).
    Tls,
}

impl SmtpTls {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(SmtpTls::StartTls),
            "tls" => Ok(SmtpTls::Tls),
            other => Err(format!("Invalid SMTP_TLS_MODE '{other}': expected starttls or tls")),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let database_name = std::env::var("DB_NAME").ok().filter(|s| !s.trim().is_empty());

        let host: IpAddr = env_or("ONBOARDING_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ONBOARDING_HOST: {e}"))?;

        let port: u16 = env_or("ONBOARDING_PORT", "8001")
            .parse()
            .map_err(|e| format!("Invalid ONBOARDING_PORT: {e}"))?;

        let max_body_size: usize = env_or("ONBOARDING_MAX_BODY_SIZE", "52428800")
            .parse()
            .map_err(|e| format!("Invalid ONBOARDING_MAX_BODY_SIZE: {e}"))?;

        let cors_origins = parse_origins(&env_or("CORS_ORIGINS", "*"));

        let log_level = env_or("ONBOARDING_LOG_LEVEL", "info");

        let smtp = SmtpConfig {
            host: env_required("SMTP_HOST")?,
            port: env_or("SMTP_PORT", "587")
                .parse()
                .map_err(|e| format!("Invalid SMTP_PORT: {e}"))?,
            user: env_required("SMTP_EMAIL")?,
            pass: env_required("SMTP_PASSWORD")?,
            tls: SmtpTls::parse(&env_or("SMTP_TLS_MODE", "starttls"))?,
        };

        let recipient_email = env_required("RECIPIENT_EMAIL")?;

        Ok(Config {
            database_url,
            database_name,
            host,
            port,
            max_body_size,
            cors_origins,
            log_level,
            smtp,
            recipient_email,
        })
    }

    /// Connection string with `DB_NAME` applied, if one was given.
    pub fn database_connect_url(&self) -> String {
        match &self.database_name {
            Some(name) => with_database_name(&self.database_url, name),
            None => self.database_url.clone(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Swap the path segment of a postgres URL, keeping any query string.
fn with_database_name(url: &str, name: &str) -> String {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };

    let authority_start = base.find("://").map(|i| i + 3).unwrap_or(0);
    let prefix = match base[authority_start..].find('/') {
        Some(slash) => &base[..authority_start + slash],
        None => base,
    };

    match query {
        Some(q) => format!("{prefix}/{name}?{q}"),
        None => format!("{prefix}/{name}"),
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_replaces_path() {
        assert_eq!(
            with_database_name("postgres://u:p@localhost:5432/app", "onboarding"),
            "postgres://u:p@localhost:5432/onboarding"
        );
    }

    #[test]
    fn database_name_keeps_query() {
        assert_eq!(
            with_database_name("postgres://localhost/app?sslmode=require", "other"),
            "postgres://localhost/other?sslmode=require"
        );
    }

    #[test]
    fn database_name_appended_without_path() {
        assert_eq!(
            with_database_name("postgres://localhost:5432", "onboarding"),
            "postgres://localhost:5432/onboarding"
        );
    }

    #[test]
    fn origins_split_and_trimmed() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example ,,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }

    #[test]
    fn tls_mode_parsing() {
        assert_eq!(SmtpTls::parse("STARTTLS").unwrap(), SmtpTls::StartTls);
        assert_eq!(SmtpTls::parse("tls").unwrap(), SmtpTls::Tls);
        assert!(SmtpTls::parse("none").is_err());
    }
}
