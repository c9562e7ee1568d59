//! Core data models for the schola backend.
//!
//! These types are shared across all schola crates and represent the core
//! domain entities: calendar events and their recurrence series, upload
//! queue jobs, and per-owner preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CALENDAR TYPES
// =============================================================================

/// Recurrence cadence for a calendar event.
///
/// This is a closed enum: every consumer matches exhaustively, so adding a
/// cadence is a compile-time-checked change. Unrecognized wire strings parse
/// to `None` (no repetition) rather than failing the request — see
/// [`RepeatPattern::parse_lenient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RepeatPattern {
    /// Single occurrence, no repetition
    #[default]
    None,
    /// Repeats every day
    Daily,
    /// Repeats every 7 days
    Weekly,
    /// Repeats every calendar month (clamped to month length)
    Monthly,
}

impl RepeatPattern {
    /// Parse a wire-format pattern string, treating anything unrecognized as
    /// "no repetition". An unknown cadence must never make expansion loop or
    /// fail; it degrades to a single occurrence.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s {
            Some("daily") => Self::Daily,
            Some("weekly") => Self::Weekly,
            Some("monthly") => Self::Monthly,
            Some("none") | None => Self::None,
            Some(other) => {
                tracing::warn!(pattern = other, "Unrecognized repeat pattern, treating as none");
                Self::None
            }
        }
    }

    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for RepeatPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many events of a series a delete request removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeleteScope {
    /// Only the given occurrence
    #[default]
    This,
    /// The given occurrence and every later one in the same series
    Following,
    /// Every occurrence in the same series
    All,
}

/// A concrete calendar event row.
///
/// Rows emitted by one create call share a `series_id`, which is what the
/// `following`/`all` deletion scopes predicate on. A non-recurring event
/// still gets its own series of one.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Uuid>,
    pub series_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Free-form event type tag ("lecture", "exam", "office-hours", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    pub repeat: RepeatPattern,
    pub created_at: DateTime<Utc>,
}

/// A calendar event row ready for insertion (no id/created_at yet).
#[derive(Debug, Clone)]
pub struct NewCalendarEvent {
    pub owner_id: Uuid,
    pub class_id: Option<Uuid>,
    pub series_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub event_type: Option<String>,
    pub repeat: RepeatPattern,
}

// =============================================================================
// UPLOAD QUEUE TYPES
// =============================================================================

/// Lifecycle status of an upload job.
///
/// Statuses move monotonically `pending → (uploading|processing) →
/// complete|error`; no job regresses. The transitions are enforced
/// structurally by status predicates on every UPDATE in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Accepted, waiting for a worker
    Pending,
    /// Bytes still being transferred to object storage
    Uploading,
    /// Claimed by a worker, ingestion in progress
    Processing,
    /// Ingestion finished successfully
    Complete,
    /// Ingestion failed; see `error_message`
    Error,
}

impl UploadStatus {
    /// Whether no further transition occurs from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row in the processing queue: a file awaiting asynchronous ingestion.
///
/// The file bytes themselves live in external object storage under
/// `storage_path`; the backend only records the reference.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadJob {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub class_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    pub storage_path: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

// =============================================================================
// PREFERENCE TYPES
// =============================================================================

/// Per-owner UI/widget preferences.
///
/// Replaces the ambient browser-storage state of the original client: loaded
/// on session start, saved on every mutation, defaulted on first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct PreferenceSet {
    /// Whether the floating chat widget is shown
    pub widget_enabled: bool,
    /// Calendar view the dashboard opens on ("month", "week", "day")
    pub default_calendar_view: String,
    /// Whether terminal upload statuses raise a notification
    pub upload_notifications: bool,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            widget_enabled: true,
            default_calendar_view: "month".to_string(),
            upload_notifications: true,
        }
    }
}

/// Stored preferences record with its audit timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OwnerPreferences {
    pub owner_id: Uuid,
    pub prefs: PreferenceSet,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_pattern_parse_lenient_known() {
        assert_eq!(
            RepeatPattern::parse_lenient(Some("daily")),
            RepeatPattern::Daily
        );
        assert_eq!(
            RepeatPattern::parse_lenient(Some("weekly")),
            RepeatPattern::Weekly
        );
        assert_eq!(
            RepeatPattern::parse_lenient(Some("monthly")),
            RepeatPattern::Monthly
        );
        assert_eq!(
            RepeatPattern::parse_lenient(Some("none")),
            RepeatPattern::None
        );
        assert_eq!(RepeatPattern::parse_lenient(None), RepeatPattern::None);
    }

    #[test]
    fn test_repeat_pattern_parse_lenient_unknown() {
        // Unknown cadences degrade to a single occurrence, never an error
        assert_eq!(
            RepeatPattern::parse_lenient(Some("biweekly")),
            RepeatPattern::None
        );
        assert_eq!(RepeatPattern::parse_lenient(Some("")), RepeatPattern::None);
    }

    #[test]
    fn test_repeat_pattern_roundtrip() {
        for p in [
            RepeatPattern::None,
            RepeatPattern::Daily,
            RepeatPattern::Weekly,
            RepeatPattern::Monthly,
        ] {
            assert_eq!(RepeatPattern::parse_lenient(Some(p.as_str())), p);
        }
    }

    #[test]
    fn test_upload_status_terminal() {
        assert!(!UploadStatus::Pending.is_terminal());
        assert!(!UploadStatus::Uploading.is_terminal());
        assert!(!UploadStatus::Processing.is_terminal());
        assert!(UploadStatus::Complete.is_terminal());
        assert!(UploadStatus::Error.is_terminal());
    }

    #[test]
    fn test_upload_status_serde_lowercase() {
        let json = serde_json::to_string(&UploadStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let back: UploadStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, UploadStatus::Error);
    }

    #[test]
    fn test_delete_scope_serde_lowercase() {
        let scope: DeleteScope = serde_json::from_str("\"following\"").unwrap();
        assert_eq!(scope, DeleteScope::Following);
    }

    #[test]
    fn test_preference_set_defaults() {
        let prefs = PreferenceSet::default();
        assert!(prefs.widget_enabled);
        assert_eq!(prefs.default_calendar_view, "month");
        assert!(prefs.upload_notifications);
    }

    #[test]
    fn test_preference_set_partial_deserialize() {
        // Missing fields fall back to defaults (serde(default))
        let prefs: PreferenceSet = serde_json::from_str(r#"{"widget_enabled": false}"#).unwrap();
        assert!(!prefs.widget_enabled);
        assert_eq!(prefs.default_calendar_view, "month");
    }
}
