pub mod submission;

pub use submission::{
    ChatbotFunctionality, CompanyIdentity, ContactInfo, CoreDirective, DocumentInfo,
    KnowledgeBase, Submission, SubmissionSummary, TechnicalDeployment,
};
