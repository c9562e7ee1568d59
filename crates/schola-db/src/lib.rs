//! # schola-db
//!
//! PostgreSQL database layer for the schola backend.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for calendar events, the upload queue,
//!   and owner preferences
//! - An aggregate [`Database`] context wiring the repositories to one pool
//!
//! ## Example
//!
//! ```rust,ignore
//! use schola_db::Database;
//! use schola_core::{expand_series, CalendarRepository, EventSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/schola").await?;
//!
//!     let rows = expand_series(&spec, owner_id, chrono::Utc::now())?;
//!     let created = db.calendar.insert_series(rows).await?;
//!     println!("Created {} occurrence(s)", created.len());
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod pool;
pub mod preferences;
pub mod uploads;

// Re-export core types
pub use schola_core::*;

// Re-export repository implementations
pub use calendar::PgCalendarRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use preferences::PgPreferenceRepository;
pub use uploads::PgUploadQueueRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::PgPool,
    /// Calendar event repository.
    pub calendar: PgCalendarRepository,
    /// Upload/processing queue repository.
    pub uploads: PgUploadQueueRepository,
    /// Owner preference repository.
    pub preferences: PgPreferenceRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            calendar: PgCalendarRepository::new(pool.clone()),
            uploads: PgUploadQueueRepository::new(pool.clone()),
            preferences: PgPreferenceRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            calendar: self.calendar.clone(),
            // Share the notify handle so enqueues through any clone wake the worker
            uploads: PgUploadQueueRepository::with_notify(
                self.pool.clone(),
                self.uploads.job_notify(),
            ),
            preferences: self.preferences.clone(),
        }
    }
}
