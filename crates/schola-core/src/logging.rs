//! Structured logging schema and field name constants for the schola backend.
//!
//! All crates use these constants for consistent structured logging fields so
//! log aggregation tools can query by standardized names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request → worker → sub-calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "worker"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "calendar", "uploads", "pool", "ingest_worker"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "create_series", "delete_scoped", "enqueue", "claim_next"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Owner (authenticated user) UUID scoping the operation.
pub const OWNER_ID: &str = "owner_id";

/// Calendar event UUID being operated on.
pub const EVENT_ID: &str = "event_id";

/// Recurrence series UUID shared by all rows of one create call.
pub const SERIES_ID: &str = "series_id";

/// Upload job UUID being processed.
pub const JOB_ID: &str = "job_id";

/// Class UUID an event or upload belongs to.
pub const CLASS_ID: &str = "class_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows emitted by recurrence expansion.
pub const OCCURRENCE_COUNT: &str = "occurrence_count";

/// Number of rows removed by a scoped delete.
pub const DELETED_COUNT: &str = "deleted_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
