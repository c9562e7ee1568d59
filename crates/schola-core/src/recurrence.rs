//! Recurring-event materialization.
//!
//! Expands one event specification into the concrete set of calendar rows to
//! persist. Expansion is pure computation: the caller supplies the wall-clock
//! "now" and receives rows; persistence (all-or-nothing batch insert) is the
//! repository's concern.

use chrono::{DateTime, Duration, Months, Utc};
use uuid::Uuid;

use crate::defaults::RECURRENCE_HORIZON_DAYS;
use crate::error::{Error, Result};
use crate::models::{NewCalendarEvent, RepeatPattern};

/// Input specification for one create call.
#[derive(Debug, Clone)]
pub struct EventSpec {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub class_id: Option<Uuid>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub event_type: Option<String>,
    pub repeat: RepeatPattern,
}

impl EventSpec {
    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title is required".to_string()));
        }
        if let Some(ends_at) = self.ends_at {
            if ends_at < self.starts_at {
                return Err(Error::Validation(
                    "ends_at must not be before starts_at".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Advance the cursor by one cadence step, or `None` when the series does
/// not repeat.
fn advance(cursor: DateTime<Utc>, pattern: RepeatPattern) -> Option<DateTime<Utc>> {
    match pattern {
        RepeatPattern::None => None,
        RepeatPattern::Daily => Some(cursor + Duration::days(1)),
        RepeatPattern::Weekly => Some(cursor + Duration::weeks(1)),
        // Clamped to month length (Jan 31 → Feb 28/29)
        RepeatPattern::Monthly => cursor.checked_add_months(Months::new(1)),
    }
}

/// Expand an event specification into the batch of rows to insert.
///
/// All emitted rows share one freshly generated `series_id`; scoped deletion
/// predicates on it later. The anchor occurrence at `starts_at` is always
/// emitted, so a valid create never yields an empty batch. A repeating spec
/// then emits further rows one cadence step at a time, stopping once the
/// next step passes `now + 365 days`. The horizon bound is what keeps
/// expansion total; it must fire even when the cadence cannot be resolved.
pub fn expand_series(
    spec: &EventSpec,
    owner_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<NewCalendarEvent>> {
    spec.validate()?;

    let series_id = Uuid::new_v4();
    let duration = spec.ends_at.map(|e| e - spec.starts_at);

    let make_row = |starts_at: DateTime<Utc>| NewCalendarEvent {
        owner_id,
        class_id: spec.class_id,
        series_id,
        title: spec.title.clone(),
        starts_at,
        ends_at: duration.map(|d| starts_at + d),
        location: spec.location.clone(),
        notes: spec.notes.clone(),
        event_type: spec.event_type.clone(),
        repeat: spec.repeat,
    };

    let horizon = now + Duration::days(RECURRENCE_HORIZON_DAYS);
    let mut rows = vec![make_row(spec.starts_at)];
    let mut cursor = spec.starts_at;
    while let Some(next) = advance(cursor, spec.repeat) {
        if next > horizon {
            break;
        }
        rows.push(make_row(next));
        cursor = next;
    }

    tracing::debug!(
        series_id = %series_id,
        pattern = %spec.repeat,
        occurrence_count = rows.len(),
        "Expanded recurring event series"
    );

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn spec(repeat: RepeatPattern) -> EventSpec {
        EventSpec {
            title: "Algebra II".to_string(),
            starts_at: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            ends_at: Some(Utc.with_ymd_and_hms(2026, 3, 2, 10, 30, 0).unwrap()),
            class_id: None,
            location: Some("Room 14".to_string()),
            notes: None,
            event_type: Some("lecture".to_string()),
            repeat,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_none_pattern_yields_single_event() {
        let s = spec(RepeatPattern::None);
        let rows = expand_series(&s, Uuid::new_v4(), now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].starts_at, s.starts_at);
        assert_eq!(rows[0].ends_at, s.ends_at);
    }

    #[test]
    fn test_unrecognized_pattern_yields_single_event() {
        // Wire strings like "biweekly" parse leniently to None, so the
        // expansion terminates with one row instead of looping
        let mut s = spec(RepeatPattern::parse_lenient(Some("biweekly")));
        s.ends_at = None;
        let rows = expand_series(&s, Uuid::new_v4(), now()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_daily_spacing_and_horizon() {
        let mut s = spec(RepeatPattern::Daily);
        s.ends_at = None;
        let n = now();
        let rows = expand_series(&s, Uuid::new_v4(), n).unwrap();

        let horizon = n + Duration::days(RECURRENCE_HORIZON_DAYS);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.starts_at, s.starts_at + Duration::days(i as i64));
            assert!(row.starts_at <= horizon);
            assert_eq!(row.ends_at, None);
        }
        // The next step past the last row must exceed the horizon
        let last = rows.last().unwrap().starts_at;
        assert!(last + Duration::days(1) > horizon);
    }

    #[test]
    fn test_weekly_spacing_preserves_duration() {
        let s = spec(RepeatPattern::Weekly);
        let rows = expand_series(&s, Uuid::new_v4(), now()).unwrap();
        assert!(rows.len() > 1);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.starts_at, s.starts_at + Duration::weeks(i as i64));
            // 90-minute duration carried to every occurrence
            assert_eq!(row.ends_at.unwrap() - row.starts_at, Duration::minutes(90));
        }
    }

    #[test]
    fn test_monthly_spacing_preserves_duration() {
        let s = spec(RepeatPattern::Monthly);
        let rows = expand_series(&s, Uuid::new_v4(), now()).unwrap();
        assert!(rows.len() >= 12);
        let horizon = now() + Duration::days(RECURRENCE_HORIZON_DAYS);
        for pair in rows.windows(2) {
            assert_eq!(
                pair[1].starts_at,
                pair[0].starts_at.checked_add_months(Months::new(1)).unwrap()
            );
        }
        for row in &rows {
            assert!(row.starts_at <= horizon);
            assert_eq!(row.ends_at.unwrap() - row.starts_at, Duration::minutes(90));
        }
    }

    #[test]
    fn test_all_rows_share_series_and_metadata() {
        let s = spec(RepeatPattern::Weekly);
        let owner = Uuid::new_v4();
        let rows = expand_series(&s, owner, now()).unwrap();
        let series_id = rows[0].series_id;
        for row in &rows {
            assert_eq!(row.series_id, series_id);
            assert_eq!(row.owner_id, owner);
            assert_eq!(row.title, "Algebra II");
            assert_eq!(row.location.as_deref(), Some("Room 14"));
            assert_eq!(row.event_type.as_deref(), Some("lecture"));
            assert_eq!(row.repeat, RepeatPattern::Weekly);
        }
    }

    #[test]
    fn test_two_create_calls_get_distinct_series() {
        let s = spec(RepeatPattern::Daily);
        let owner = Uuid::new_v4();
        let a = expand_series(&s, owner, now()).unwrap();
        let b = expand_series(&s, owner, now()).unwrap();
        // Identical titles, distinct series: scoped deletes never conflate them
        assert_ne!(a[0].series_id, b[0].series_id);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut s = spec(RepeatPattern::None);
        s.ends_at = Some(s.starts_at - Duration::hours(1));
        let err = expand_series(&s, Uuid::new_v4(), now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut s = spec(RepeatPattern::None);
        s.title = "   ".to_string();
        let err = expand_series(&s, Uuid::new_v4(), now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_start_beyond_horizon_still_emits_anchor() {
        // A series scheduled entirely past the horizon must still create its
        // first occurrence rather than silently persisting nothing
        let mut s = spec(RepeatPattern::Daily);
        s.starts_at = Utc.with_ymd_and_hms(2027, 10, 1, 9, 0, 0).unwrap();
        s.ends_at = None;
        let rows = expand_series(&s, Uuid::new_v4(), now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].starts_at, s.starts_at);
    }

    #[test]
    fn test_monthly_clamps_at_month_end() {
        let mut s = spec(RepeatPattern::Monthly);
        s.starts_at = Utc.with_ymd_and_hms(2026, 1, 31, 9, 0, 0).unwrap();
        s.ends_at = None;
        let n = Utc.with_ymd_and_hms(2026, 1, 30, 0, 0, 0).unwrap();
        let rows = expand_series(&s, Uuid::new_v4(), n).unwrap();
        // Jan 31 → Feb 28 (2026 is not a leap year)
        assert_eq!(
            rows[1].starts_at,
            Utc.with_ymd_and_hms(2026, 2, 28, 9, 0, 0).unwrap()
        );
    }
}
