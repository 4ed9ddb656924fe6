//! Advisor error types.
//!
//! Every failure mode has a named variant. Degenerate-but-valid inputs (zero
//! spread, zero cost, zero retrieval score, unknown resource position) are not
//! errors; they resolve through documented fallback arithmetic.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AdvisorError {
    #[error("Metric series is empty")]
    EmptySeries,

    #[error("DAU is zero on {date}; ARPU is undefined")]
    ZeroDau { date: NaiveDate },

    #[error("Revenue on {date} must be finite and non-negative, got {value}")]
    InvalidRevenue { date: NaiveDate, value: f64 },

    #[error("Dates must be strictly ascending: {current} follows {previous}")]
    UnorderedDates {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Rolling window must hold at least one row")]
    InvalidWindow,

    #[error("Anomaly threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("DAU guard percentage must be finite and non-negative, got {0}")]
    InvalidDauGuard(f64),

    #[error("Max capacity for {position} must be in (0, 1], got {value}")]
    InvalidCapacity { position: String, value: f64 },

    #[error("Invalid {field} for {position}: {value}")]
    InvalidPositionParameter {
        position: String,
        field: &'static str,
        value: f64,
    },

    #[error("Resource position listed twice: {0}")]
    DuplicatePosition(String),

    #[error("Baseline ARPU must be finite and positive, got {0}")]
    InvalidBaseline(f64),

    #[error("Usage for {position} must be in [0, 1], got {value}")]
    InvalidUsage { position: String, value: f64 },

    #[error("Case index has not been built; call build_index first")]
    IndexNotBuilt,

    #[error("Case index is already built; use a fresh retriever to rebuild")]
    IndexAlreadyBuilt,
}

/// Result type alias for advisor operations.
pub type AdvisorResult<T> = Result<T, AdvisorError>;
