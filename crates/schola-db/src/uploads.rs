//! Upload queue repository implementation.
//!
//! Producer side inserts `pending` rows and wakes the worker through a
//! shared [`Notify`] handle; the consumer claims with `FOR UPDATE SKIP
//! LOCKED` so concurrent workers never double-process a job. Status
//! monotonicity is enforced by the status predicate on every UPDATE: a
//! claim only fires on `pending`, a terminal mark only on `processing`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::Notify;
use tracing::{debug, info};
use uuid::Uuid;

use schola_core::{
    EnqueueUpload, Error, Result, UploadJob, UploadQueueRepository, UploadStatus,
};

/// PostgreSQL implementation of UploadQueueRepository.
#[derive(Clone)]
pub struct PgUploadQueueRepository {
    pool: PgPool,
    /// Notify handle for event-driven worker wake on enqueue.
    notify: Arc<Notify>,
}

impl PgUploadQueueRepository {
    /// Create a new PgUploadQueueRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            notify: Arc::new(Notify::new()),
        }
    }

    /// Create a repository sharing an existing notify handle.
    pub fn with_notify(pool: PgPool, notify: Arc<Notify>) -> Self {
        Self { pool, notify }
    }

    /// Get the notification handle for event-driven worker waking.
    pub fn job_notify(&self) -> Arc<Notify> {
        self.notify.clone()
    }

    /// Convert string from database to UploadStatus.
    fn str_to_status(s: &str) -> UploadStatus {
        match s {
            "pending" => UploadStatus::Pending,
            "uploading" => UploadStatus::Uploading,
            "processing" => UploadStatus::Processing,
            "complete" => UploadStatus::Complete,
            "error" => UploadStatus::Error,
            _ => UploadStatus::Pending, // fallback
        }
    }

    /// Parse a queue row into an UploadJob struct.
    fn parse_job_row(row: sqlx::postgres::PgRow) -> UploadJob {
        UploadJob {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            class_id: row.get("class_id"),
            folder_id: row.get("folder_id"),
            storage_path: row.get("storage_path"),
            file_name: row.get("file_name"),
            mime_type: row.get("mime_type"),
            size_bytes: row.get("size_bytes"),
            status: Self::str_to_status(row.get("status")),
            error_message: row.get("error_message"),
            created_at: row.get("created_at"),
            started_at: row.get("started_at"),
            completed_at: row.get("completed_at"),
        }
    }
}

const JOB_COLUMNS: &str = "id, owner_id, class_id, folder_id, storage_path, file_name, \
                           mime_type, size_bytes, status, error_message, created_at, \
                           started_at, completed_at";

#[async_trait]
impl UploadQueueRepository for PgUploadQueueRepository {
    async fn enqueue(&self, owner_id: Uuid, req: EnqueueUpload) -> Result<UploadJob> {
        let row = sqlx::query(&format!(
            "INSERT INTO upload_queue
                 (id, owner_id, class_id, folder_id, storage_path, file_name,
                  mime_type, size_bytes, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', now())
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(req.class_id)
        .bind(req.folder_id)
        .bind(&req.storage_path)
        .bind(&req.file_name)
        .bind(&req.mime_type)
        .bind(req.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let job = Self::parse_job_row(row);
        info!(
            subsystem = "db",
            component = "uploads",
            op = "enqueue",
            job_id = %job.id,
            class_id = %job.class_id,
            size_bytes = job.size_bytes,
            "Enqueued upload job"
        );

        self.notify.notify_waiters();
        Ok(job)
    }

    async fn fetch(&self, owner_id: Uuid, id: Uuid) -> Result<UploadJob> {
        let row = sqlx::query(&format!(
            "SELECT {JOB_COLUMNS} FROM upload_queue WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(Self::parse_job_row).ok_or(Error::JobNotFound(id))
    }

    async fn list_for_class(&self, owner_id: Uuid, class_id: Uuid) -> Result<Vec<UploadJob>> {
        let rows = sqlx::query(&format!(
            "SELECT {JOB_COLUMNS} FROM upload_queue
             WHERE owner_id = $1 AND class_id = $2
             ORDER BY created_at DESC
             LIMIT $3"
        ))
        .bind(owner_id)
        .bind(class_id)
        .bind(schola_core::defaults::PAGE_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(Self::parse_job_row).collect())
    }

    async fn claim_next(&self) -> Result<Option<UploadJob>> {
        // FOR UPDATE SKIP LOCKED: concurrent workers each claim a distinct
        // pending job. The inner status predicate is the pending → processing
        // transition guard.
        let row = sqlx::query(&format!(
            "UPDATE upload_queue
             SET status = 'processing', started_at = now()
             WHERE id = (
                 SELECT id FROM upload_queue
                 WHERE status = 'pending'
                 ORDER BY created_at ASC
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {JOB_COLUMNS}"
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(Self::parse_job_row))
    }

    async fn mark_complete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE upload_queue
             SET status = 'complete', completed_at = now(), error_message = NULL
             WHERE id = $1 AND status = 'processing'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::Worker(format!(
                "job {id} is not in processing status"
            )));
        }
        debug!(
            subsystem = "db",
            component = "uploads",
            op = "mark_complete",
            job_id = %id,
            "Upload job complete"
        );
        Ok(())
    }

    async fn mark_error(&self, id: Uuid, message: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE upload_queue
             SET status = 'error', completed_at = now(), error_message = $2
             WHERE id = $1 AND status = 'processing'",
        )
        .bind(id)
        .bind(message)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::Worker(format!(
                "job {id} is not in processing status"
            )));
        }
        debug!(
            subsystem = "db",
            component = "uploads",
            op = "mark_error",
            job_id = %id,
            error = message,
            "Upload job failed"
        );
        Ok(())
    }
}
