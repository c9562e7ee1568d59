//! Ingest handler seam.
//!
//! The worker drives status transitions; what "ingestion" actually does to
//! the file (text extraction, chunking, embedding) lives behind
//! [`IngestHandler`] so it can be swapped per deployment and stubbed in
//! tests.

use async_trait::async_trait;
use uuid::Uuid;

use schola_core::UploadJob;

/// Context provided to ingest handlers.
pub struct IngestContext {
    /// The job being processed.
    pub job: UploadJob,
}

impl IngestContext {
    /// Create a new ingest context.
    pub fn new(job: UploadJob) -> Self {
        Self { job }
    }

    /// The job's id.
    pub fn job_id(&self) -> Uuid {
        self.job.id
    }

    /// Object-storage reference of the file to ingest.
    pub fn storage_path(&self) -> &str {
        &self.job.storage_path
    }
}

/// Result of one ingest run.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Ingestion finished; the job moves to `complete`.
    Success,
    /// Ingestion failed; the job moves to `error` with this message.
    /// Sibling jobs in the same batch are unaffected.
    Failed(String),
}

/// Trait for upload ingest handlers.
#[async_trait]
pub trait IngestHandler: Send + Sync {
    /// Process one claimed job.
    async fn ingest(&self, ctx: IngestContext) -> IngestOutcome;
}

/// No-op handler for tests and dry-run deployments: accepts every job.
#[derive(Debug, Default)]
pub struct NoOpIngestHandler;

#[async_trait]
impl IngestHandler for NoOpIngestHandler {
    async fn ingest(&self, ctx: IngestContext) -> IngestOutcome {
        tracing::debug!(job_id = %ctx.job_id(), "NoOp ingest");
        IngestOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use schola_core::UploadStatus;

    fn job() -> UploadJob {
        UploadJob {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            class_id: Uuid::new_v4(),
            folder_id: None,
            storage_path: "classes/x/file.pdf".to_string(),
            file_name: "file.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 42,
            status: UploadStatus::Processing,
            error_message: None,
            created_at: Utc::now(),
            started_at: Some(Utc::now()),
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_noop_handler_succeeds() {
        let handler = NoOpIngestHandler;
        let outcome = handler.ingest(IngestContext::new(job())).await;
        assert!(matches!(outcome, IngestOutcome::Success));
    }

    #[test]
    fn test_context_accessors() {
        let j = job();
        let ctx = IngestContext::new(j.clone());
        assert_eq!(ctx.job_id(), j.id);
        assert_eq!(ctx.storage_path(), "classes/x/file.pdf");
    }
}
