use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::candidate::{CandidateRecord, StoredCandidate};
use crate::models::job::JobPosting;
use crate::store::rows::{CvRow, JobRow};
use crate::store::{CandidateStore, StorageError};

/// PostgreSQL-backed store. JSON fields live in JSONB columns.
#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn store(&self, record: &CandidateRecord) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        let skills = encode("skills", &record.skills)?;
        let experience = encode("experience", &record.experience)?;
        let education = encode("education", &record.education)?;

        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO cvs
                (id, name, email, skills, experience, education,
                 summary, job_title, parse_error, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(id)
        .bind(record.name.as_deref())
        .bind(record.email.as_deref())
        .bind(skills)
        .bind(experience)
        .bind(education)
        .bind(record.summary.as_deref())
        .bind(record.job_title.as_deref())
        .bind(record.parse_error.as_deref())
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Inserted CV {id}");
        Ok(id)
    }

    async fn fetch_all_candidates(&self) -> Result<Vec<StoredCandidate>, StorageError> {
        let rows = sqlx::query_as::<_, CvRow>(
            r#"
            SELECT id, name, email, skills, experience, education,
                   summary, job_title, parse_error, created_at
            FROM cvs
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredCandidate::from).collect())
    }

    async fn fetch_all_jobs(&self) -> Result<Vec<JobPosting>, StorageError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT id, title, skills FROM jobs ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn create_job(&self, job: &JobPosting) -> Result<Uuid, StorageError> {
        let id = Uuid::new_v4();
        let skills = encode("skills", &job.required_skills)?;

        sqlx::query("INSERT INTO jobs (id, title, skills) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&job.title)
            .bind(skills)
            .execute(&self.pool)
            .await?;

        info!("Inserted job posting {id} ({})", job.title);
        Ok(id)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}

fn encode<T: Serialize>(field: &'static str, value: &T) -> Result<Value, StorageError> {
    serde_json::to_value(value).map_err(|source| StorageError::Encode { field, source })
}
