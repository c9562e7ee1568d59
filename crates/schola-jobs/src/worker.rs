//! Ingest worker: claims upload jobs and drives them to a terminal status.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, Notify};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use schola_core::defaults::{INGEST_MAX_CONCURRENT, WORKER_EVENT_CAPACITY};
use schola_core::{Result, UploadJob, UploadQueueRepository};

use crate::handler::{IngestContext, IngestHandler, IngestOutcome};
use crate::DEFAULT_POLL_INTERVAL_MS;

/// Configuration for the ingest worker.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Polling interval in milliseconds when the queue is empty.
    pub poll_interval_ms: u64,
    /// Maximum number of concurrent jobs.
    pub max_concurrent_jobs: usize,
    /// Whether to enable job processing.
    pub enabled: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_concurrent_jobs: INGEST_MAX_CONCURRENT,
            enabled: true,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `INGEST_WORKER_ENABLED` | `true` | Enable/disable job processing |
    /// | `INGEST_MAX_CONCURRENT` | `4` | Max concurrent jobs |
    /// | `INGEST_POLL_INTERVAL_MS` | `500` | Polling interval when queue is empty |
    pub fn from_env() -> Self {
        let enabled = std::env::var("INGEST_WORKER_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let max_concurrent_jobs = std::env::var("INGEST_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(INGEST_MAX_CONCURRENT)
            .max(1);

        let poll_interval_ms = std::env::var("INGEST_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        Self {
            poll_interval_ms,
            max_concurrent_jobs,
            enabled,
        }
    }

    /// Create a new config with custom poll interval.
    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set maximum concurrent jobs.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max;
        self
    }

    /// Enable or disable job processing.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Event emitted by the ingest worker.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A job was claimed and processing started.
    JobStarted { job_id: Uuid },
    /// A job completed successfully.
    JobCompleted { job_id: Uuid },
    /// A job failed.
    JobFailed { job_id: Uuid, error: String },
    /// Worker started.
    WorkerStarted,
    /// Worker stopped.
    WorkerStopped,
}

/// Handle for controlling a running worker.
pub struct WorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    event_rx: broadcast::Receiver<WorkerEvent>,
}

impl WorkerHandle {
    /// Signal the worker to shut down gracefully.
    pub async fn shutdown(&self) -> Result<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| schola_core::Error::Worker("Failed to send shutdown signal".into()))?;
        Ok(())
    }

    /// Get a receiver for worker events.
    pub fn events(&self) -> broadcast::Receiver<WorkerEvent> {
        self.event_rx.resubscribe()
    }
}

/// Ingest worker that processes jobs from the upload queue.
pub struct IngestWorker {
    queue: Arc<dyn UploadQueueRepository>,
    /// Wake handle shared with the producer side (enqueue).
    notify: Arc<Notify>,
    config: WorkerConfig,
    handler: Arc<dyn IngestHandler>,
    event_tx: broadcast::Sender<WorkerEvent>,
}

impl IngestWorker {
    /// Create a new ingest worker.
    pub fn new(
        queue: Arc<dyn UploadQueueRepository>,
        notify: Arc<Notify>,
        config: WorkerConfig,
        handler: Arc<dyn IngestHandler>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(WORKER_EVENT_CAPACITY);
        Self {
            queue,
            notify,
            config,
            handler,
            event_tx,
        }
    }

    /// Start the worker and return a handle for control.
    pub fn start(self) -> WorkerHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let event_rx = self.event_tx.subscribe();

        tokio::spawn(async move {
            self.run(&mut shutdown_rx).await;
        });

        WorkerHandle {
            shutdown_tx,
            event_rx,
        }
    }

    /// Run the worker loop with concurrent job processing.
    ///
    /// Claims up to `max_concurrent_jobs` at a time. When the queue is empty
    /// the loop parks on the enqueue notification, with the poll interval as
    /// a fallback for rows inserted out-of-process.
    async fn run(&self, shutdown_rx: &mut mpsc::Receiver<()>) {
        if !self.config.enabled {
            info!(subsystem = "worker", "Ingest worker is disabled, not starting");
            return;
        }

        info!(
            subsystem = "worker",
            poll_interval_ms = self.config.poll_interval_ms,
            max_concurrent = self.config.max_concurrent_jobs,
            "Ingest worker started"
        );
        let _ = self.event_tx.send(WorkerEvent::WorkerStarted);

        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);

        loop {
            if shutdown_rx.try_recv().is_ok() {
                info!(subsystem = "worker", "Ingest worker received shutdown signal");
                break;
            }

            let mut tasks = tokio::task::JoinSet::new();
            for _ in 0..self.config.max_concurrent_jobs {
                match self.claim_job().await {
                    Some(job) => {
                        let queue = self.queue.clone();
                        let handler = self.handler.clone();
                        let event_tx = self.event_tx.clone();
                        tasks.spawn(async move {
                            execute_job(queue, handler, event_tx, job).await;
                        });
                    }
                    None => break,
                }
            }

            if tasks.is_empty() {
                // Queue empty — park until an enqueue wakes us or the poll
                // interval elapses
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!(subsystem = "worker", "Ingest worker received shutdown signal");
                        break;
                    }
                    _ = self.notify.notified() => {}
                    _ = sleep(poll_interval) => {}
                }
            } else {
                debug!(subsystem = "worker", claimed = tasks.len(), "Processing job batch");
                while let Some(result) = tasks.join_next().await {
                    if let Err(e) = result {
                        error!(subsystem = "worker", error = ?e, "Ingest task panicked");
                    }
                }
            }
        }

        let _ = self.event_tx.send(WorkerEvent::WorkerStopped);
        info!(subsystem = "worker", "Ingest worker stopped");
    }

    async fn claim_job(&self) -> Option<UploadJob> {
        match self.queue.claim_next().await {
            Ok(job) => job,
            Err(e) => {
                error!(subsystem = "worker", error = %e, "Failed to claim job");
                None
            }
        }
    }
}

/// Process one claimed job through to a terminal status.
async fn execute_job(
    queue: Arc<dyn UploadQueueRepository>,
    handler: Arc<dyn IngestHandler>,
    event_tx: broadcast::Sender<WorkerEvent>,
    job: UploadJob,
) {
    let job_id = job.id;
    debug!(
        subsystem = "worker",
        job_id = %job_id,
        file_name = %job.file_name,
        "Ingest started"
    );
    let _ = event_tx.send(WorkerEvent::JobStarted { job_id });

    match handler.ingest(IngestContext::new(job)).await {
        IngestOutcome::Success => {
            if let Err(e) = queue.mark_complete(job_id).await {
                error!(subsystem = "worker", job_id = %job_id, error = %e,
                       "Failed to mark job complete");
                return;
            }
            let _ = event_tx.send(WorkerEvent::JobCompleted { job_id });
        }
        IngestOutcome::Failed(message) => {
            warn!(subsystem = "worker", job_id = %job_id, error = %message, "Ingest failed");
            if let Err(e) = queue.mark_error(job_id, &message).await {
                error!(subsystem = "worker", job_id = %job_id, error = %e,
                       "Failed to mark job errored");
                return;
            }
            let _ = event_tx.send(WorkerEvent::JobFailed {
                job_id,
                error: message,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use schola_core::{EnqueueUpload, Error, UploadStatus};
    use std::sync::Mutex;

    /// In-memory queue standing in for Postgres in worker loop tests.
    struct MemQueue {
        jobs: Mutex<Vec<UploadJob>>,
    }

    impl MemQueue {
        fn with_pending(n: usize) -> Self {
            let jobs = (0..n)
                .map(|i| UploadJob {
                    id: Uuid::new_v4(),
                    owner_id: Uuid::new_v4(),
                    class_id: Uuid::new_v4(),
                    folder_id: None,
                    storage_path: format!("classes/x/file-{i}.pdf"),
                    file_name: format!("file-{i}.pdf"),
                    mime_type: "application/pdf".to_string(),
                    size_bytes: 10,
                    status: UploadStatus::Pending,
                    error_message: None,
                    created_at: Utc::now(),
                    started_at: None,
                    completed_at: None,
                })
                .collect();
            Self {
                jobs: Mutex::new(jobs),
            }
        }

        fn statuses(&self) -> Vec<UploadStatus> {
            self.jobs.lock().unwrap().iter().map(|j| j.status).collect()
        }
    }

    #[async_trait]
    impl UploadQueueRepository for MemQueue {
        async fn enqueue(&self, _owner_id: Uuid, _req: EnqueueUpload) -> Result<UploadJob> {
            unimplemented!("not exercised by worker tests")
        }

        async fn fetch(&self, _owner_id: Uuid, id: Uuid) -> Result<UploadJob> {
            self.jobs
                .lock()
                .unwrap()
                .iter()
                .find(|j| j.id == id)
                .cloned()
                .ok_or(Error::JobNotFound(id))
        }

        async fn list_for_class(&self, _owner_id: Uuid, _class_id: Uuid) -> Result<Vec<UploadJob>> {
            Ok(self.jobs.lock().unwrap().clone())
        }

        async fn claim_next(&self) -> Result<Option<UploadJob>> {
            let mut jobs = self.jobs.lock().unwrap();
            for job in jobs.iter_mut() {
                if job.status == UploadStatus::Pending {
                    job.status = UploadStatus::Processing;
                    job.started_at = Some(Utc::now());
                    return Ok(Some(job.clone()));
                }
            }
            Ok(None)
        }

        async fn mark_complete(&self, id: Uuid) -> Result<()> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == id && j.status == UploadStatus::Processing)
                .ok_or(Error::Worker(format!("job {id} not processing")))?;
            job.status = UploadStatus::Complete;
            job.completed_at = Some(Utc::now());
            Ok(())
        }

        async fn mark_error(&self, id: Uuid, message: &str) -> Result<()> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == id && j.status == UploadStatus::Processing)
                .ok_or(Error::Worker(format!("job {id} not processing")))?;
            job.status = UploadStatus::Error;
            job.error_message = Some(message.to_string());
            job.completed_at = Some(Utc::now());
            Ok(())
        }
    }

    /// Handler that fails jobs whose file name contains "bad".
    struct PickyHandler;

    #[async_trait]
    impl IngestHandler for PickyHandler {
        async fn ingest(&self, ctx: IngestContext) -> IngestOutcome {
            if ctx.job.file_name.contains("bad") {
                IngestOutcome::Failed("unsupported format".to_string())
            } else {
                IngestOutcome::Success
            }
        }
    }

    async fn run_until_settled(queue: Arc<MemQueue>, handler: Arc<dyn IngestHandler>) {
        let notify = Arc::new(Notify::new());
        let worker = IngestWorker::new(
            queue.clone(),
            notify,
            WorkerConfig::default().with_poll_interval(10),
            handler,
        );
        let handle = worker.start();

        for _ in 0..100 {
            if queue.statuses().iter().all(|s| s.is_terminal()) {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_drives_jobs_to_complete() {
        let queue = Arc::new(MemQueue::with_pending(3));
        run_until_settled(queue.clone(), Arc::new(crate::NoOpIngestHandler)).await;
        assert!(queue
            .statuses()
            .iter()
            .all(|s| *s == UploadStatus::Complete));
    }

    #[tokio::test]
    async fn test_failed_job_does_not_block_siblings() {
        let queue = Arc::new(MemQueue::with_pending(3));
        queue.jobs.lock().unwrap()[1].file_name = "bad.bin".to_string();

        run_until_settled(queue.clone(), Arc::new(PickyHandler)).await;

        let statuses = queue.statuses();
        assert_eq!(statuses[0], UploadStatus::Complete);
        assert_eq!(statuses[1], UploadStatus::Error);
        assert_eq!(statuses[2], UploadStatus::Complete);
    }

    #[tokio::test]
    async fn test_disabled_worker_touches_nothing() {
        let queue = Arc::new(MemQueue::with_pending(2));
        let notify = Arc::new(Notify::new());
        let worker = IngestWorker::new(
            queue.clone(),
            notify,
            WorkerConfig::default().with_enabled(false),
            Arc::new(crate::NoOpIngestHandler),
        );
        let _handle = worker.start();
        sleep(Duration::from_millis(50)).await;
        assert!(queue
            .statuses()
            .iter()
            .all(|s| *s == UploadStatus::Pending));
    }

    #[test]
    fn test_worker_config_builder() {
        let config = WorkerConfig::default()
            .with_poll_interval(100)
            .with_max_concurrent(8)
            .with_enabled(false);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.max_concurrent_jobs, 8);
        assert!(!config.enabled);
    }
}
