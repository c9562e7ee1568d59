//! # schola-jobs
//!
//! Background ingest worker for the schola upload queue.
//!
//! This crate provides:
//! - A polling worker that claims `pending` upload jobs and drives them to a
//!   terminal status (`complete` or `error`)
//! - Event-driven wake on enqueue via a shared [`tokio::sync::Notify`]
//! - Lifecycle notifications over a broadcast channel
//! - The [`IngestHandler`] seam behind which the actual extraction/embedding
//!   work lives
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use schola_jobs::{IngestWorker, NoOpIngestHandler, WorkerConfig};
//! use schola_db::Database;
//!
//! let db = Database::connect("postgres://...").await?;
//! let worker = IngestWorker::new(
//!     Arc::new(db.uploads.clone()),
//!     db.uploads.job_notify(),
//!     WorkerConfig::from_env(),
//!     Arc::new(NoOpIngestHandler),
//! );
//! let handle = worker.start();
//!
//! // Listen for events
//! let mut events = handle.events();
//! while let Ok(event) = events.recv().await {
//!     println!("Event: {:?}", event);
//! }
//!
//! // Graceful shutdown
//! handle.shutdown().await?;
//! ```

pub mod handler;
pub mod worker;

// Re-export core types
pub use schola_core::*;

pub use handler::{IngestContext, IngestHandler, IngestOutcome, NoOpIngestHandler};
pub use worker::{IngestWorker, WorkerConfig, WorkerEvent, WorkerHandle};

/// Default polling interval for job processing (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = schola_core::defaults::INGEST_POLL_INTERVAL_MS;
