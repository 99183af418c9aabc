pub mod templates;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{SmtpConfig, SmtpTls};
use crate::models::Submission;
use crate::submission::parser::UploadedFile;

/// Outbound delivery of a fully built message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), String>;
}

/// Authenticated relay over STARTTLS or implicit TLS. The transport pools
/// connections, each send checks one out and returns it when done.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let builder = match config.tls {
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| format!("SMTP relay error: {e}"))?,
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| format!("SMTP starttls error: {e}"))?,
        };

        let transport = builder.port(config.port).credentials(creds).build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<(), String> {
        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;
        Ok(())
    }
}

/// Build the operator notification: plain-text summary plus one attachment
/// per uploaded file, logo first.
pub fn build_notification(
    from: &str,
    to: &str,
    submission: &Submission,
    attachments: &[&UploadedFile],
) -> Result<Message, String> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| format!("Invalid from address: {e}"))?;
    let to: Mailbox = to.parse().map_err(|e| format!("Invalid to address: {e}"))?;

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(templates::render_submission(
        submission,
    )));

    for file in attachments {
        parts = parts.singlepart(
            Attachment::new(file.filename.clone()).body(file.data.to_vec(), attachment_type(file)?),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(templates::render_subject(submission))
        .multipart(parts)
        .map_err(|e| format!("Failed to build email: {e}"))
}

const OCTET_STREAM: &str = "application/octet-stream";

/// Declared type when it parses, otherwise octet-stream.
fn attachment_type(file: &UploadedFile) -> Result<ContentType, String> {
    if let Some(declared) = file
        .content_type
        .as_deref()
        .and_then(|ct| ContentType::parse(ct).ok())
    {
        return Ok(declared);
    }
    ContentType::parse(OCTET_STREAM).map_err(|e| format!("Invalid attachment type: {e}"))
}
