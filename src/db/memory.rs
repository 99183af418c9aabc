use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::SubmissionStore;
use crate::models::Submission;

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySubmissionStore {
    submissions: RwLock<Vec<Submission>>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn insert(&self, submission: &Submission) -> Result<(), sqlx::Error> {
        self.submissions.write().await.push(submission.clone());
        Ok(())
    }

    async fn list(&self, limit: i64) -> Result<Vec<Submission>, sqlx::Error> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .submissions
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, sqlx::Error> {
        Ok(self
            .submissions
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}
