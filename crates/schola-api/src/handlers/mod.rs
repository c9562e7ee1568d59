//! HTTP request handlers, grouped by resource.

pub mod calendar;
pub mod preferences;
pub mod uploads;
