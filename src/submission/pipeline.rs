use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use crate::email;
use crate::error::AppError;
use crate::models::{DocumentInfo, Submission};
use crate::state::SharedState;

use super::fields::Sections;
use super::parser::{IntakeForm, UploadedFile};

pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Validate, store, then notify. Nothing is written unless the whole form is
/// valid. A notification failure after the write is reported with the id of
/// the stored row.
pub async fn run(state: &SharedState, form: IntakeForm) -> Result<Submission, AppError> {
    check_sizes(&form)?;
    let sections = Sections::from_fields(&form.fields)?;
    let submission = assemble(sections, form.logo.as_ref(), &form.documents);

    let attachments: Vec<&UploadedFile> =
        form.logo.iter().chain(form.documents.iter()).collect();

    let message = email::build_notification(
        &state.config.smtp.user,
        &state.config.recipient_email,
        &submission,
        &attachments,
    )
    .map_err(AppError::Internal)?;

    state.store.insert(&submission).await?;
    tracing::info!(
        "Stored submission {} ({} documents, logo: {})",
        submission.id,
        submission.documents_info.len(),
        submission.logo_filename.is_some()
    );

    state
        .mailer
        .send(message)
        .await
        .map_err(|message| AppError::Notification {
            submission_id: submission.id,
            message,
        })?;
    tracing::info!(
        "Notification for submission {} sent to {}",
        submission.id,
        state.config.recipient_email
    );

    Ok(submission)
}

fn check_sizes(form: &IntakeForm) -> Result<(), AppError> {
    if let Some(logo) = &form.logo {
        if logo.data.len() > MAX_LOGO_BYTES {
            return Err(AppError::PayloadTooLarge(format!(
                "Logo {} exceeds {} bytes",
                logo.filename, MAX_LOGO_BYTES
            )));
        }
    }

    if let Some(doc) = form.documents.iter().find(|d| d.data.len() > MAX_DOCUMENT_BYTES) {
        return Err(AppError::PayloadTooLarge(format!(
            "Document {} exceeds {} bytes",
            doc.filename, MAX_DOCUMENT_BYTES
        )));
    }

    Ok(())
}

/// Build the immutable record. Document bytes are reduced to metadata here.
fn assemble(
    sections: Sections,
    logo: Option<&UploadedFile>,
    documents: &[UploadedFile],
) -> Submission {
    let documents_info = documents
        .iter()
        .map(|doc| DocumentInfo {
            filename: doc.filename.clone(),
            size: doc.data.len() as u64,
            content_type: doc.content_type.clone(),
        })
        .collect();

    Submission {
        id: Uuid::now_v7(),
        contact_info: sections.contact_info,
        company_identity: sections.company_identity,
        chatbot_functionality: sections.chatbot_functionality,
        knowledge_base: sections.knowledge_base,
        technical_deployment: sections.technical_deployment,
        logo_filename: logo.map(|l| l.filename.clone()),
        logo_content_type: logo.and_then(|l| l.content_type.clone()),
        logo_data: logo.map(|l| STANDARD.encode(&l.data)),
        documents_info,
        // Postgres keeps microseconds; match it so every copy agrees.
        timestamp: Utc::now().trunc_subsecs(6),
    }
}
