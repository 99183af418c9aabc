use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lettre::Message;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use onboarding::config::{Config, SmtpConfig, SmtpTls};
use onboarding::db::{
    MemorySubmissionStore, PgSubmissionStore, SUBMISSION_LIST_CAP, SubmissionStore,
};
use onboarding::email::Mailer;

pub const RECIPIENT: &str = "operator@test.com";
pub const SENDER: &str = "onboarding@test.com";

/// Captures outgoing mail instead of talking to a relay.
#[derive(Default)]
pub struct RecordingMailer {
    messages: Mutex<Vec<Message>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    /// Raw RFC 5322 text of every sent message.
    pub fn sent_raw(&self) -> Vec<String> {
        self.sent()
            .iter()
            .map(|m| String::from_utf8_lossy(&m.formatted()).into_owned())
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: Message) -> Result<(), String> {
        if self.fail {
            return Err("connection refused by relay".to_string());
        }
        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}

/// A running test server. The store is in memory unless built by
/// [`spawn_pg_app`].
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<dyn SubmissionStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Number of rows the store would list.
    pub async fn stored_count(&self) -> usize {
        self.store
            .list(SUBMISSION_LIST_CAP)
            .await
            .expect("list failed")
            .len()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a multipart form, return (body, status).
    pub async fn submit(&self, form: Form) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/submissions"))
            .multipart(form)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused/unused".to_string(),
        database_name: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        max_body_size: 52_428_800,
        cors_origins: vec!["*".to_string()],
        log_level: "warn".to_string(),
        smtp: SmtpConfig {
            host: "smtp.test.invalid".to_string(),
            port: 587,
            user: SENDER.to_string(),
            pass: "secret".to_string(),
            tls: SmtpTls::StartTls,
        },
        recipient_email: RECIPIENT.to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(RecordingMailer::default(), test_config()).await
}

pub async fn spawn_app_with(mailer: RecordingMailer, config: Config) -> TestApp {
    serve(Arc::new(MemorySubmissionStore::new()), mailer, config).await
}

/// Test server over a fresh Postgres database. Requires `DATABASE_URL`.
/// Pass the returned pool and name to [`drop_database`] when done.
#[allow(dead_code)]
pub async fn spawn_pg_app() -> (TestApp, PgPool, String) {
    let (pool, db_name) = spawn_database().await;
    let store = Arc::new(PgSubmissionStore::new(pool.clone()));
    let app = serve(store, RecordingMailer::default(), test_config()).await;
    (app, pool, db_name)
}

async fn serve(
    store: Arc<dyn SubmissionStore>,
    mailer: RecordingMailer,
    config: Config,
) -> TestApp {
    let mailer = Arc::new(mailer);

    let app = onboarding::build_app(store.clone(), mailer.clone(), config);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        store,
        mailer,
    }
}

/// The five questionnaire sections as sent by the onboarding form.
pub fn sections() -> Value {
    json!({
        "contact_info": {
            "name": "Test User",
            "email": "test@example.com"
        },
        "company_identity": {
            "legal_name": "Test Company Ltd",
            "website": "https://testcompany.com",
            "chatbot_display_name": "TestBot",
            "chatbot_persona": "Friendly and helpful",
            "primary_brand_color": "#FF5733",
            "secondary_brand_color": "#33FF57",
            "accent_color": "#5733FF",
            "background_color": "default",
            "chatbot_size": "default"
        },
        "chatbot_functionality": {
            "business_hours": "Mon-Fri, 9:00 AM - 5:00 PM EST",
            "out_of_hours_response": "We're currently closed. Please leave a message.",
            "conversation_starters": ["How can I help you?", "What services do you need?"]
        },
        "knowledge_base": {
            "knowledge_base_description": "Company FAQ and product information",
            "csv_format_confirmed": true,
            "core_directive": "Option A",
            "fallback_message": null,
            "other_ai_directives": "Be professional and helpful",
            "support_contact": "support@testcompany.com"
        },
        "technical_deployment": {
            "website_platform": "WordPress",
            "website_management": "Internal team",
            "technical_contact_name": "Tech Lead",
            "technical_contact_email": "tech@testcompany.com",
            "deployment_preference": "Self-deployment preferred"
        }
    })
}

/// Encode each section as its own JSON text field.
pub fn form_from(sections: &Value) -> Form {
    let mut form = Form::new();
    for (name, value) in sections.as_object().unwrap() {
        form = form.text(name.clone(), value.to_string());
    }
    form
}

pub fn file_part(filename: &str, content_type: &str, data: &[u8]) -> Part {
    Part::bytes(data.to_vec())
        .file_name(filename.to_string())
        .mime_str(content_type)
        .unwrap()
}

/// Fresh Postgres database with migrations applied. Requires `DATABASE_URL`.
#[allow(dead_code)]
pub async fn spawn_database() -> (PgPool, String) {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("onboarding_test_{}", Uuid::now_v7().simple());

    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    (pool, db_name)
}

/// Drop a database created by [`spawn_database`].
#[allow(dead_code)]
pub async fn drop_database(pool: PgPool, db_name: &str) {
    pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.clone());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
