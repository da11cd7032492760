//! Error types for RDI computation

use thiserror::Error;

/// Result type alias for RDI operations.
pub type Result<T> = std::result::Result<T, RdiError>;

/// Lookup failure against the quantile table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MissingKey {
    #[error("event '{event}' not found")]
    Event { event: String },

    #[error("quantile {level} not found for event '{event}'")]
    Quantile { event: String, level: String },
}

/// Unified error type for RDI computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RdiError {
    #[error("invalid recovery duration: {days} (must be a finite, non-negative number of days)")]
    InvalidDuration { days: f64 },

    #[error("undefined reference range: z_min == z_max == {z}")]
    DegenerateRange { z: f64 },

    #[error("invalid reference range: z_min={z_min}, z_max={z_max}")]
    InvalidRange { z_min: f64, z_max: f64 },

    #[error(transparent)]
    MissingKey(#[from] MissingKey),

    #[error("quantile table is empty")]
    EmptyTable,

    #[error("event name must not be blank")]
    BlankEventName,

    #[error("quantile {level} is listed more than once")]
    DuplicateQuantile { level: String },

    #[error("invalid quantile level: {value} (must lie strictly between 0 and 1)")]
    InvalidQuantile { value: String },

    #[error("unknown weather label: {label}")]
    UnknownWeather { label: String },
}

impl RdiError {
    pub(crate) fn missing_event(event: &str) -> Self {
        RdiError::MissingKey(MissingKey::Event {
            event: event.to_string(),
        })
    }

    pub(crate) fn missing_quantile(event: &str, level: impl ToString) -> Self {
        RdiError::MissingKey(MissingKey::Quantile {
            event: event.to_string(),
            level: level.to_string(),
        })
    }

    /// Check whether this is a lookup failure rather than a computation failure
    pub fn is_missing_key(&self) -> bool {
        matches!(self, RdiError::MissingKey(_))
    }
}
