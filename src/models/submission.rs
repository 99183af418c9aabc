use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyIdentity {
    pub legal_name: String,
    pub website: String,
    pub chatbot_display_name: String,
    #[serde(default)]
    pub chatbot_persona: Option<String>,
    pub primary_brand_color: String,
    pub secondary_brand_color: String,
    pub accent_color: String,
    #[serde(default = "default_background_color")]
    pub background_color: Option<String>,
    #[serde(default = "default_chatbot_size")]
    pub chatbot_size: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatbotFunctionality {
    #[serde(default)]
    pub business_hours: Option<String>,
    #[serde(default)]
    pub out_of_hours_response: Option<String>,
    #[serde(default)]
    pub conversation_starters: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub knowledge_base_description: Option<String>,
    #[serde(default = "default_csv_format_confirmed")]
    pub csv_format_confirmed: Option<bool>,
    #[serde(default)]
    pub core_directive: CoreDirective,
    #[serde(default)]
    pub fallback_message: Option<String>,
    #[serde(default)]
    pub other_ai_directives: Option<String>,
    pub support_contact: String,
}

/// How strictly the chatbot sticks to the supplied knowledge base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreDirective {
    /// Documents first, general knowledge allowed.
    #[default]
    #[serde(rename = "Option A")]
    Flexible,
    /// Answers only from the documents; needs a fallback message.
    #[serde(rename = "Option B")]
    Strict,
}

impl CoreDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoreDirective::Flexible => "Option A",
            CoreDirective::Strict => "Option B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalDeployment {
    pub website_platform: String,
    pub website_management: String,
    pub technical_contact_name: String,
    pub technical_contact_email: String,
    pub deployment_preference: String,
}

/// Metadata for an uploaded document. The bytes themselves are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    pub size: u64,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub contact_info: ContactInfo,
    pub company_identity: CompanyIdentity,
    pub chatbot_functionality: ChatbotFunctionality,
    pub knowledge_base: KnowledgeBase,
    pub technical_deployment: TechnicalDeployment,
    pub logo_filename: Option<String>,
    pub logo_content_type: Option<String>,
    /// Base64 of the logo bytes.
    pub logo_data: Option<String>,
    pub documents_info: Vec<DocumentInfo>,
    pub timestamp: DateTime<Utc>,
}

/// Returned to the client after a successful intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: Uuid,
    pub contact_info: ContactInfo,
    pub timestamp: DateTime<Utc>,
}

impl From<&Submission> for SubmissionSummary {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id,
            contact_info: submission.contact_info.clone(),
            timestamp: submission.timestamp,
        }
    }
}

fn default_background_color() -> Option<String> {
    Some("default".to_string())
}

fn default_chatbot_size() -> String {
    "default".to_string()
}

fn default_csv_format_confirmed() -> Option<bool> {
    Some(false)
}
