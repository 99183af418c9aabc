use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{
    ChatbotFunctionality, CompanyIdentity, ContactInfo, DocumentInfo, KnowledgeBase, Submission,
    TechnicalDeployment,
};

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    contact_info: Json<ContactInfo>,
    company_identity: Json<CompanyIdentity>,
    chatbot_functionality: Json<ChatbotFunctionality>,
    knowledge_base: Json<KnowledgeBase>,
    technical_deployment: Json<TechnicalDeployment>,
    logo_filename: Option<String>,
    logo_content_type: Option<String>,
    logo_data: Option<String>,
    documents_info: Json<Vec<DocumentInfo>>,
    created_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            contact_info: row.contact_info.0,
            company_identity: row.company_identity.0,
            chatbot_functionality: row.chatbot_functionality.0,
            knowledge_base: row.knowledge_base.0,
            technical_deployment: row.technical_deployment.0,
            logo_filename: row.logo_filename,
            logo_content_type: row.logo_content_type,
            logo_data: row.logo_data,
            documents_info: row.documents_info.0,
            timestamp: row.created_at,
        }
    }
}

pub async fn create(pool: &PgPool, submission: &Submission) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO submissions (
            id, contact_info, company_identity, chatbot_functionality, knowledge_base,
            technical_deployment, logo_filename, logo_content_type, logo_data,
            documents_info, created_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(submission.id)
    .bind(Json(&submission.contact_info))
    .bind(Json(&submission.company_identity))
    .bind(Json(&submission.chatbot_functionality))
    .bind(Json(&submission.knowledge_base))
    .bind(Json(&submission.technical_deployment))
    .bind(submission.logo_filename.as_deref())
    .bind(submission.logo_content_type.as_deref())
    .bind(submission.logo_data.as_deref())
    .bind(Json(&submission.documents_info))
    .bind(submission.timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Submission>, sqlx::Error> {
    let row = sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Submission::from))
}

/// Oldest first, at most `limit` rows.
pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Submission>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SubmissionRow>(
        "SELECT * FROM submissions ORDER BY created_at ASC, id ASC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Submission::from).collect())
}
