use std::fmt::Write;

use crate::models::Submission;

const PLACEHOLDER: &str = "N/A";
const RULE: &str = "========================================";

pub fn render_subject(submission: &Submission) -> String {
    format!(
        "New AI Chatbot Onboarding Form - {}",
        submission.contact_info.name
    )
}

/// Plain-text rendering of every submitted field. Output depends only on the
/// submission, so the same record always produces the same body.
pub fn render_submission(submission: &Submission) -> String {
    let contact = &submission.contact_info;
    let company = &submission.company_identity;
    let chatbot = &submission.chatbot_functionality;
    let kb = &submission.knowledge_base;
    let tech = &submission.technical_deployment;

    let starters = chatbot
        .conversation_starters
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| s.join(", "))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let mut body = String::new();
    let _ = writeln!(body, "New AI Chatbot Onboarding Questionnaire Submission");
    let _ = writeln!(body);

    section(&mut body, "CONTACT INFORMATION");
    line(&mut body, "Name", &contact.name);
    line(&mut body, "Email", &contact.email);

    section(&mut body, "COMPANY IDENTITY & BRANDING");
    line(&mut body, "Company Legal Name", &company.legal_name);
    line(&mut body, "Company Website", &company.website);
    line(&mut body, "Chatbot Display Name", &company.chatbot_display_name);
    line(&mut body, "Chatbot Persona & Tone", or_placeholder(&company.chatbot_persona));
    line(&mut body, "Primary Brand Color", &company.primary_brand_color);
    line(&mut body, "Secondary Brand Color", &company.secondary_brand_color);
    line(&mut body, "Accent Color", &company.accent_color);
    line(
        &mut body,
        "Background Color",
        company.background_color.as_deref().unwrap_or("default"),
    );
    line(&mut body, "Chatbot Size", &company.chatbot_size);

    section(&mut body, "CHATBOT CORE FUNCTIONALITY");
    line(&mut body, "Business Operating Hours", or_placeholder(&chatbot.business_hours));
    line(&mut body, "Out-of-Hours Response", or_placeholder(&chatbot.out_of_hours_response));
    line(&mut body, "Conversation Starters", &starters);

    section(&mut body, "KNOWLEDGE BASE & SYSTEM BEHAVIOR");
    line(
        &mut body,
        "Knowledge Base Description",
        or_placeholder(&kb.knowledge_base_description),
    );
    line(
        &mut body,
        "CSV Format Confirmed",
        if kb.csv_format_confirmed.unwrap_or(false) { "Yes" } else { "No" },
    );
    line(&mut body, "Chatbot Core Directive", kb.core_directive.as_str());
    line(&mut body, "Fallback Message", or_placeholder(&kb.fallback_message));
    line(&mut body, "Other AI Directives", or_placeholder(&kb.other_ai_directives));
    line(&mut body, "Support Contact", &kb.support_contact);

    section(&mut body, "TECHNICAL DEPLOYMENT");
    line(&mut body, "Website Platform", &tech.website_platform);
    line(&mut body, "Website Management", &tech.website_management);
    line(&mut body, "Technical Contact Name", &tech.technical_contact_name);
    line(&mut body, "Technical Contact Email", &tech.technical_contact_email);
    line(&mut body, "Deployment Preference", &tech.deployment_preference);

    let _ = writeln!(body, "{RULE}");
    line(&mut body, "Submission ID", &submission.id.to_string());
    line(&mut body, "Submission Time", &submission.timestamp.to_rfc3339());

    body
}

fn section(body: &mut String, title: &str) {
    let _ = writeln!(body, "{RULE}");
    let _ = writeln!(body, "{title}");
    let _ = writeln!(body, "{RULE}");
}

fn line(body: &mut String, label: &str, value: &str) {
    let _ = writeln!(body, "{label}: {value}");
}

fn or_placeholder(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(PLACEHOLDER)
}
