/// Domain module containing core business logic and data types
///
/// This module defines the day-key calendar, the Habit entity with its two
/// history fields, the JSON record form, and the streak/heatmap metrics.
/// Everything here is synchronous and free of I/O.

pub mod calendar;
pub mod habit;
pub mod metrics;
pub mod record;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use habit::*;
pub use metrics::*;
pub use record::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid day key '{0}', expected YYYY-MM-DD")]
    InvalidDayKey(String),

    #[error("Invalid habit type '{0}', expected 'check' or 'count'")]
    InvalidHabitType(String),

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),
}
