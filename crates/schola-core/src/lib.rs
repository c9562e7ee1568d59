//! # schola-core
//!
//! Core types, traits, and domain logic for the schola backend.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other schola crates depend on, plus the two pure pieces of domain
//! logic the platform is built around: recurring-event expansion and
//! upload-batch status summarization.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod recurrence;
pub mod summary;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use recurrence::{expand_series, EventSpec};
pub use summary::{batch_summary, BatchProgress};
pub use traits::*;
