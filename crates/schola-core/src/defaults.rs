//! Centralized default constants for the schola backend.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// RECURRENCE
// =============================================================================

/// Forward horizon for recurrence expansion, in days.
///
/// Expansion stops once the cursor passes `now + RECURRENCE_HORIZON_DAYS`.
/// This bound is a correctness invariant (it caps the loop at ~366
/// iterations for a daily cadence), not a tuning parameter.
pub const RECURRENCE_HORIZON_DAYS: i64 = 365;

// =============================================================================
// INGEST WORKER
// =============================================================================

/// Polling interval when the upload queue is empty (milliseconds).
pub const INGEST_POLL_INTERVAL_MS: u64 = 500;

/// Maximum upload jobs processed concurrently by one worker.
pub const INGEST_MAX_CONCURRENT: usize = 4;

/// Capacity of the worker lifecycle event broadcast channel.
pub const WORKER_EVENT_CAPACITY: usize = 256;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints (events, upload jobs).
pub const PAGE_LIMIT: i64 = 50;
