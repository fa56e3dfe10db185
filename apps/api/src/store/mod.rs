//! Persistence boundary for CVs and job postings.
//!
//! Route handlers and the ingestion pipeline only see `Arc<dyn CandidateStore>`; the
//! backend is picked once at startup from `DATABASE_URL`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::candidate::{CandidateRecord, StoredCandidate};
use crate::models::job::JobPosting;

pub mod memory;
pub mod postgres;
pub mod rows;

pub use memory::MemoryCandidateStore;
pub use postgres::PgCandidateStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to encode {field}: {source}")]
    Encode {
        field: &'static str,
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Inserts one CV record atomically and returns its id.
    /// A single attempt; callers decide whether to retry.
    async fn store(&self, record: &CandidateRecord) -> Result<Uuid, StorageError>;

    /// All stored CVs, oldest first.
    async fn fetch_all_candidates(&self) -> Result<Vec<StoredCandidate>, StorageError>;

    /// All job postings, oldest first.
    async fn fetch_all_jobs(&self) -> Result<Vec<JobPosting>, StorageError>;

    async fn create_job(&self, job: &JobPosting) -> Result<Uuid, StorageError>;

    /// Releases backend resources. Called once on shutdown.
    async fn close(&self) {}
}
