use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::candidate::{CandidateRecord, StoredCandidate};
use crate::models::job::JobPosting;
use crate::store::{CandidateStore, StorageError};

/// Process-local store used when no database is configured, and in tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryCandidateStore {
    cvs: RwLock<Vec<StoredCandidate>>,
    jobs: RwLock<Vec<JobPosting>>,
}

impl MemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandidateStore for MemoryCandidateStore {
    async fn store(&self, record: &CandidateRecord) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        self.cvs.write().await.push(StoredCandidate {
            id,
            record: record.clone(),
        });
        Ok(id)
    }

    async fn fetch_all_candidates(&self) -> Result<Vec<StoredCandidate>, StorageError> {
        Ok(self.cvs.read().await.clone())
    }

    async fn fetch_all_jobs(&self) -> Result<Vec<JobPosting>, StorageError> {
        Ok(self.jobs.read().await.clone())
    }

    async fn create_job(&self, job: &JobPosting) -> Result<Uuid, StorageError> {
        self.jobs.write().await.push(job.clone());
        Ok(Uuid::new_v4())
    }
}
