//! schola-api - HTTP API server for the schola backend.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use schola_api::{router, AppState};
use schola_db::{Database, PoolConfig};
use schola_jobs::{IngestWorker, NoOpIngestHandler, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let db = Database::connect_with_config(&database_url, PoolConfig::from_env()).await?;
    db.migrate().await?;

    // Ingest worker shares the queue's notify handle so enqueues wake it
    // immediately. The NoOp handler accepts every job; deployments wire in
    // their extraction pipeline here.
    let worker = IngestWorker::new(
        Arc::new(db.uploads.clone()),
        db.uploads.job_notify(),
        WorkerConfig::from_env(),
        Arc::new(NoOpIngestHandler),
    );
    let worker_handle = worker.start();

    let app = router(AppState { db });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(subsystem = "api", addr = %bind_addr, "schola-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    worker_handle.shutdown().await.ok();
    info!(subsystem = "api", "schola-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!(subsystem = "api", "Shutdown signal received");
}
