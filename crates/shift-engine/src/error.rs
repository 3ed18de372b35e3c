//! Error types for shift-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// A window is active with `start > end`, or a clock value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Weekdays are ISO numbered, Monday = 1 through Sunday = 7.
    #[error("Invalid weekday number: {0} (expected 1-7)")]
    InvalidWeekday(u8),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
