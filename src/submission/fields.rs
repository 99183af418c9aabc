use std::collections::HashMap;

use lettre::Address;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;
use crate::models::{
    ChatbotFunctionality, CompanyIdentity, ContactInfo, CoreDirective, KnowledgeBase,
    TechnicalDeployment,
};

pub const CONTACT_INFO: &str = "contact_info";
pub const COMPANY_IDENTITY: &str = "company_identity";
pub const CHATBOT_FUNCTIONALITY: &str = "chatbot_functionality";
pub const KNOWLEDGE_BASE: &str = "knowledge_base";
pub const TECHNICAL_DEPLOYMENT: &str = "technical_deployment";

/// The five questionnaire sections, decoded and checked.
#[derive(Debug, Clone)]
pub struct Sections {
    pub contact_info: ContactInfo,
    pub company_identity: CompanyIdentity,
    pub chatbot_functionality: ChatbotFunctionality,
    pub knowledge_base: KnowledgeBase,
    pub technical_deployment: TechnicalDeployment,
}

impl Sections {
    /// Decode every section. Syntax errors map to 400, schema errors to 422.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, AppError> {
        let sections = Sections {
            contact_info: parse_section(fields, CONTACT_INFO)?,
            company_identity: parse_section(fields, COMPANY_IDENTITY)?,
            chatbot_functionality: parse_section(fields, CHATBOT_FUNCTIONALITY)?,
            knowledge_base: parse_section(fields, KNOWLEDGE_BASE)?,
            technical_deployment: parse_section(fields, TECHNICAL_DEPLOYMENT)?,
        };
        sections.validate().map_err(AppError::Validation)?;
        Ok(sections)
    }

    fn validate(&self) -> Result<(), String> {
        require_text(CONTACT_INFO, "name", &self.contact_info.name)?;
        require_email(CONTACT_INFO, "email", &self.contact_info.email)?;

        require_text(COMPANY_IDENTITY, "legal_name", &self.company_identity.legal_name)?;
        require_text(
            COMPANY_IDENTITY,
            "chatbot_display_name",
            &self.company_identity.chatbot_display_name,
        )?;

        require_text(KNOWLEDGE_BASE, "support_contact", &self.knowledge_base.support_contact)?;
        if self.knowledge_base.core_directive == CoreDirective::Strict {
            let fallback = self.knowledge_base.fallback_message.as_deref().unwrap_or("");
            if fallback.trim().is_empty() {
                return Err(format!(
                    "{KNOWLEDGE_BASE}.fallback_message is required for Option B"
                ));
            }
        }

        require_text(
            TECHNICAL_DEPLOYMENT,
            "technical_contact_name",
            &self.technical_deployment.technical_contact_name,
        )?;
        require_email(
            TECHNICAL_DEPLOYMENT,
            "technical_contact_email",
            &self.technical_deployment.technical_contact_email,
        )?;

        Ok(())
    }
}

/// Decode one JSON-encoded form field into its sub-record.
pub fn parse_section<T: DeserializeOwned>(
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<T, AppError> {
    let raw = fields
        .get(name)
        .ok_or_else(|| AppError::Validation(format!("Missing form field: {name}")))?;

    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON data in {name}: {e}")))?;

    serde_json::from_value(value).map_err(|e| AppError::Validation(format!("Invalid {name}: {e}")))
}

fn require_text(section: &str, field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{section}.{field} must not be empty"));
    }
    Ok(())
}

fn require_email(section: &str, field: &str, value: &str) -> Result<(), String> {
    value
        .trim()
        .parse::<Address>()
        .map(|_| ())
        .map_err(|_| format!("{section}.{field} is not a valid email address"))
}
