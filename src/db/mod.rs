pub mod memory;
pub mod submissions;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Submission;

pub use memory::MemorySubmissionStore;

/// Upper bound on rows returned by a listing.
pub const SUBMISSION_LIST_CAP: i64 = 1000;

/// Append-only submission storage. Rows are never updated or deleted.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: &Submission) -> Result<(), sqlx::Error>;

    /// Submissions in creation order, at most `limit` of them.
    async fn list(&self, limit: i64) -> Result<Vec<Submission>, sqlx::Error>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, sqlx::Error>;
}

pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, submission: &Submission) -> Result<(), sqlx::Error> {
        submissions::create(&self.pool, submission).await
    }

    async fn list(&self, limit: i64) -> Result<Vec<Submission>, sqlx::Error> {
        submissions::list(&self.pool, limit).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Submission>, sqlx::Error> {
        submissions::find_by_id(&self.pool, id).await
    }
}
