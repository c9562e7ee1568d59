//! Core traits for schola persistence abstractions.
//!
//! These traits define the interfaces the PostgreSQL layer implements,
//! keeping handlers and the ingest worker decoupled from sqlx for
//! testability.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;

// =============================================================================
// CALENDAR REPOSITORY
// =============================================================================

/// Request for listing calendar events.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ListEventsRequest {
    /// Window start (inclusive); unbounded when absent
    pub from: Option<DateTime<Utc>>,
    /// Window end (exclusive); unbounded when absent
    pub to: Option<DateTime<Utc>>,
    /// Restrict to one class
    pub class_id: Option<Uuid>,
}

/// Request for updating a single event in place (rename, reschedule).
///
/// Absent fields are left unchanged. There is no way to clear an optional
/// field through this request: `ends_at`, `location`, `notes`, and
/// `event_type` can only be replaced, not set back to null. Clients that
/// need a clean slate delete the occurrence and recreate it.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub event_type: Option<String>,
}

/// Repository for calendar event persistence.
///
/// Every read and mutation is owner-scoped: the owner predicate is part of
/// the SQL, so cross-owner access is structurally impossible rather than
/// filtered after the fact.
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Insert an expanded series as one all-or-nothing batch.
    async fn insert_series(&self, rows: Vec<NewCalendarEvent>) -> Result<Vec<CalendarEvent>>;

    /// Fetch one event owned by the caller.
    async fn fetch(&self, owner_id: Uuid, id: Uuid) -> Result<CalendarEvent>;

    /// List the caller's events within a window, newest first.
    async fn list(&self, owner_id: Uuid, req: ListEventsRequest) -> Result<Vec<CalendarEvent>>;

    /// Update one event's fields in place. `None` means "keep the current
    /// value"; see [`UpdateEventRequest`] for the clearing limitation.
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        req: UpdateEventRequest,
    ) -> Result<CalendarEvent>;

    /// Delete the anchor event and, per scope, other members of its series.
    /// Returns the number of rows removed; zero matches is not an error.
    async fn delete_scoped(&self, owner_id: Uuid, id: Uuid, scope: DeleteScope) -> Result<u64>;
}

// =============================================================================
// UPLOAD QUEUE REPOSITORY
// =============================================================================

/// Wire-format enqueue request. Required fields are `Option` so that a
/// missing field surfaces as a domain validation error (HTTP 400) instead of
/// a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct EnqueueUploadRequest {
    pub storage_path: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub class_id: Option<Uuid>,
    pub folder_id: Option<Uuid>,
}

/// A validated enqueue request ready for insertion.
#[derive(Debug, Clone)]
pub struct EnqueueUpload {
    pub storage_path: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub class_id: Uuid,
    pub folder_id: Option<Uuid>,
}

impl EnqueueUploadRequest {
    /// Validate the hand-off contract: the blob must already exist in object
    /// storage (`storage_path`) and the upload must target a class.
    pub fn validate(self) -> Result<EnqueueUpload> {
        let storage_path = match self.storage_path {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(Error::Validation("storage_path is required".to_string())),
        };
        let class_id = self
            .class_id
            .ok_or_else(|| Error::Validation("class_id is required".to_string()))?;

        Ok(EnqueueUpload {
            file_name: self.file_name.unwrap_or_else(|| {
                storage_path
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            }),
            mime_type: self
                .mime_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            size_bytes: self.size_bytes.unwrap_or(0),
            folder_id: self.folder_id,
            storage_path,
            class_id,
        })
    }
}

/// Response for listing a class's upload jobs.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ListUploadsResponse {
    pub jobs: Vec<UploadJob>,
    /// One-line batch summary (see [`crate::summary`])
    pub summary: String,
}

/// Repository for the upload/processing queue.
///
/// The producer side (enqueue) is called by the API; the consumer side
/// (claim/mark) by the ingest worker. Status moves monotonically: a claim
/// only fires on `pending`, a terminal mark only on `processing`.
#[async_trait]
pub trait UploadQueueRepository: Send + Sync {
    /// Insert one `pending` job and wake the worker. Fire-and-forget: the
    /// caller gets the job back before any processing starts.
    async fn enqueue(&self, owner_id: Uuid, req: EnqueueUpload) -> Result<UploadJob>;

    /// Fetch one job owned by the caller.
    async fn fetch(&self, owner_id: Uuid, id: Uuid) -> Result<UploadJob>;

    /// List the caller's jobs for a class, newest first.
    async fn list_for_class(&self, owner_id: Uuid, class_id: Uuid) -> Result<Vec<UploadJob>>;

    /// Claim the oldest pending job, transitioning it to `processing`.
    async fn claim_next(&self) -> Result<Option<UploadJob>>;

    /// Mark a processing job `complete`.
    async fn mark_complete(&self, id: Uuid) -> Result<()>;

    /// Mark a processing job `error` with a diagnostic message.
    async fn mark_error(&self, id: Uuid, message: &str) -> Result<()>;
}

// =============================================================================
// PREFERENCE REPOSITORY
// =============================================================================

/// Repository for per-owner preferences.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    /// Load the owner's preferences, falling back to defaults on first use.
    async fn load(&self, owner_id: Uuid) -> Result<OwnerPreferences>;

    /// Upsert the owner's preferences.
    async fn save(&self, owner_id: Uuid, prefs: PreferenceSet) -> Result<OwnerPreferences>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> EnqueueUploadRequest {
        EnqueueUploadRequest {
            storage_path: Some("classes/7f/syllabus.pdf".to_string()),
            file_name: Some("syllabus.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
            size_bytes: Some(52_431),
            class_id: Some(Uuid::new_v4()),
            folder_id: None,
        }
    }

    #[test]
    fn test_enqueue_validate_ok() {
        let upload = full_request().validate().unwrap();
        assert_eq!(upload.storage_path, "classes/7f/syllabus.pdf");
        assert_eq!(upload.mime_type, "application/pdf");
    }

    #[test]
    fn test_enqueue_missing_storage_path_rejected() {
        let mut req = full_request();
        req.storage_path = None;
        assert!(matches!(req.validate(), Err(Error::Validation(_))));

        let mut req = full_request();
        req.storage_path = Some("   ".to_string());
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_enqueue_missing_class_rejected() {
        let mut req = full_request();
        req.class_id = None;
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_enqueue_fills_defaults() {
        let mut req = full_request();
        req.file_name = None;
        req.mime_type = None;
        req.size_bytes = None;
        let upload = req.validate().unwrap();
        assert_eq!(upload.file_name, "syllabus.pdf");
        assert_eq!(upload.mime_type, "application/octet-stream");
        assert_eq!(upload.size_bytes, 0);
    }
}
