//! Error types for race calendar operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation errors for user-supplied race fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A distance value outside the four known categories.
    #[error("invalid race distance category: {0}")]
    InvalidCategory(String),

    /// A start time with seconds, which storage cannot keep.
    #[error("invalid start time {0:?}: use HH:MM")]
    InvalidStartTime(String),

    /// The month grid around this date runs past the supported date range.
    #[error("month of {0} is outside the supported calendar range")]
    CalendarOutOfRange(NaiveDate),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
