//! Owner preference repository implementation.
//!
//! Preferences are stored as one JSONB row per owner. Load falls back to
//! [`PreferenceSet::default`] on first use; save upserts. Unknown keys in
//! stored JSON are dropped on read, so schema evolution is forward-safe.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use schola_core::{Error, OwnerPreferences, PreferenceRepository, PreferenceSet, Result};

/// PostgreSQL implementation of PreferenceRepository.
#[derive(Clone)]
pub struct PgPreferenceRepository {
    pool: PgPool,
}

impl PgPreferenceRepository {
    /// Create a new PgPreferenceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceRepository for PgPreferenceRepository {
    async fn load(&self, owner_id: Uuid) -> Result<OwnerPreferences> {
        let row = sqlx::query(
            "SELECT prefs, updated_at FROM owner_preferences WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => {
                let prefs: serde_json::Value = row.get("prefs");
                let prefs: PreferenceSet = serde_json::from_value(prefs)?;
                Ok(OwnerPreferences {
                    owner_id,
                    prefs,
                    updated_at: row.get("updated_at"),
                })
            }
            None => {
                debug!(
                    subsystem = "db",
                    component = "preferences",
                    owner_id = %owner_id,
                    "No stored preferences, returning defaults"
                );
                Ok(OwnerPreferences {
                    owner_id,
                    prefs: PreferenceSet::default(),
                    updated_at: Utc::now(),
                })
            }
        }
    }

    async fn save(&self, owner_id: Uuid, prefs: PreferenceSet) -> Result<OwnerPreferences> {
        let row = sqlx::query(
            "INSERT INTO owner_preferences (owner_id, prefs, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (owner_id)
             DO UPDATE SET prefs = EXCLUDED.prefs, updated_at = now()
             RETURNING updated_at",
        )
        .bind(owner_id)
        .bind(serde_json::to_value(&prefs)?)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(OwnerPreferences {
            owner_id,
            prefs,
            updated_at: row.get("updated_at"),
        })
    }
}
