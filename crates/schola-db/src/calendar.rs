//! Calendar event repository implementation.
//!
//! Series semantics: every create call stamps its rows with one `series_id`,
//! and the `following`/`all` deletion scopes predicate on that key. Two
//! series that happen to share a title are never conflated. All predicates
//! carry `owner_id`, so cross-owner reads and deletes cannot match.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use schola_core::{
    CalendarEvent, CalendarRepository, DeleteScope, Error, ListEventsRequest, NewCalendarEvent,
    RepeatPattern, Result, UpdateEventRequest,
};

/// PostgreSQL implementation of CalendarRepository.
#[derive(Clone)]
pub struct PgCalendarRepository {
    pool: PgPool,
}

impl PgCalendarRepository {
    /// Create a new PgCalendarRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert string from database to RepeatPattern.
    fn str_to_pattern(s: &str) -> RepeatPattern {
        RepeatPattern::parse_lenient(Some(s))
    }

    /// Parse an event row into a CalendarEvent struct.
    fn parse_event_row(row: sqlx::postgres::PgRow) -> CalendarEvent {
        CalendarEvent {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            class_id: row.get("class_id"),
            series_id: row.get("series_id"),
            title: row.get("title"),
            starts_at: row.get("starts_at"),
            ends_at: row.get("ends_at"),
            location: row.get("location"),
            notes: row.get("notes"),
            event_type: row.get("event_type"),
            repeat: Self::str_to_pattern(row.get("repeat")),
            created_at: row.get("created_at"),
        }
    }

    async fn insert_one(
        tx: &mut Transaction<'_, Postgres>,
        row: &NewCalendarEvent,
    ) -> Result<CalendarEvent> {
        let inserted = sqlx::query(
            "INSERT INTO calendar_events
                 (id, owner_id, class_id, series_id, title, starts_at, ends_at,
                  location, notes, event_type, repeat, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now())
             RETURNING id, owner_id, class_id, series_id, title, starts_at, ends_at,
                       location, notes, event_type, repeat, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(row.owner_id)
        .bind(row.class_id)
        .bind(row.series_id)
        .bind(&row.title)
        .bind(row.starts_at)
        .bind(row.ends_at)
        .bind(&row.location)
        .bind(&row.notes)
        .bind(&row.event_type)
        .bind(row.repeat.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

        Ok(Self::parse_event_row(inserted))
    }
}

#[async_trait]
impl CalendarRepository for PgCalendarRepository {
    async fn insert_series(&self, rows: Vec<NewCalendarEvent>) -> Result<Vec<CalendarEvent>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let series_id = rows[0].series_id;

        // One transaction: the whole batch lands or none of it does
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let mut created = Vec::with_capacity(rows.len());
        for row in &rows {
            created.push(Self::insert_one(&mut tx, row).await?);
        }
        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "calendar",
            op = "insert_series",
            series_id = %series_id,
            occurrence_count = created.len(),
            "Inserted calendar event series"
        );
        Ok(created)
    }

    async fn fetch(&self, owner_id: Uuid, id: Uuid) -> Result<CalendarEvent> {
        let row = sqlx::query(
            "SELECT id, owner_id, class_id, series_id, title, starts_at, ends_at,
                    location, notes, event_type, repeat, created_at
             FROM calendar_events
             WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(Self::parse_event_row)
            .ok_or(Error::EventNotFound(id))
    }

    async fn list(&self, owner_id: Uuid, req: ListEventsRequest) -> Result<Vec<CalendarEvent>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, class_id, series_id, title, starts_at, ends_at,
                    location, notes, event_type, repeat, created_at
             FROM calendar_events
             WHERE owner_id = $1
               AND ($2::timestamptz IS NULL OR starts_at >= $2)
               AND ($3::timestamptz IS NULL OR starts_at < $3)
               AND ($4::uuid IS NULL OR class_id = $4)
             ORDER BY starts_at ASC",
        )
        .bind(owner_id)
        .bind(req.from)
        .bind(req.to)
        .bind(req.class_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(Self::parse_event_row).collect())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        req: UpdateEventRequest,
    ) -> Result<CalendarEvent> {
        // Read-modify-write so the start/end invariant is checked against the
        // merged state, not just the changed fields
        let current = self.fetch(owner_id, id).await?;

        let title = req.title.unwrap_or(current.title);
        let starts_at = req.starts_at.unwrap_or(current.starts_at);
        let ends_at = req.ends_at.or(current.ends_at);
        let location = req.location.or(current.location);
        let notes = req.notes.or(current.notes);
        let event_type = req.event_type.or(current.event_type);

        if title.trim().is_empty() {
            return Err(Error::Validation("title is required".to_string()));
        }
        if let Some(e) = ends_at {
            if e < starts_at {
                return Err(Error::Validation(
                    "ends_at must not be before starts_at".to_string(),
                ));
            }
        }

        let row = sqlx::query(
            "UPDATE calendar_events
             SET title = $3, starts_at = $4, ends_at = $5, location = $6,
                 notes = $7, event_type = $8
             WHERE id = $1 AND owner_id = $2
             RETURNING id, owner_id, class_id, series_id, title, starts_at, ends_at,
                       location, notes, event_type, repeat, created_at",
        )
        .bind(id)
        .bind(owner_id)
        .bind(&title)
        .bind(starts_at)
        .bind(ends_at)
        .bind(&location)
        .bind(&notes)
        .bind(&event_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(Self::parse_event_row)
            .ok_or(Error::EventNotFound(id))
    }

    async fn delete_scoped(&self, owner_id: Uuid, id: Uuid, scope: DeleteScope) -> Result<u64> {
        // Anchor lookup is itself owner-scoped; a foreign id is NotFound
        let anchor = self.fetch(owner_id, id).await?;

        let result = match scope {
            DeleteScope::This => {
                sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND owner_id = $2")
                    .bind(id)
                    .bind(owner_id)
                    .execute(&self.pool)
                    .await
            }
            DeleteScope::Following => {
                sqlx::query(
                    "DELETE FROM calendar_events
                     WHERE series_id = $1 AND owner_id = $2 AND starts_at >= $3",
                )
                .bind(anchor.series_id)
                .bind(owner_id)
                .bind(anchor.starts_at)
                .execute(&self.pool)
                .await
            }
            DeleteScope::All => {
                sqlx::query("DELETE FROM calendar_events WHERE series_id = $1 AND owner_id = $2")
                    .bind(anchor.series_id)
                    .bind(owner_id)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(Error::Database)?;

        let deleted = result.rows_affected();
        debug!(
            subsystem = "db",
            component = "calendar",
            op = "delete_scoped",
            event_id = %id,
            series_id = %anchor.series_id,
            scope = ?scope,
            deleted_count = deleted,
            "Deleted calendar events"
        );
        Ok(deleted)
    }
}
