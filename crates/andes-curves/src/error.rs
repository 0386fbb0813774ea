//! Error types for curve operations.

use andes_core::{CoreError, Date};
use andes_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors raised by curve construction and queries.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// A query date precedes the curve's settlement date.
    #[error("Date {date} precedes curve settlement {settlement}")]
    DateBeforeSettlement {
        /// The offending query date.
        date: Date,
        /// The curve's settlement date.
        settlement: Date,
    },

    /// A query date lies beyond the last node and extrapolation is
    /// disabled.
    #[error("Date {date} is beyond the last curve node {max} and extrapolation is disabled")]
    DateOutOfRange {
        /// The offending query date.
        date: Date,
        /// The last node date.
        max: Date,
    },

    /// Node dates are not strictly increasing.
    #[error("Node dates must be strictly increasing: {prev} then {current}")]
    NonMonotonicDates {
        /// Previous node date.
        prev: Date,
        /// Offending node date.
        current: Date,
    },

    /// A curve was given both discount-factor and zero-rate nodes.
    #[error("Curve nodes must be all discount factors or all zero rates, not a mixture")]
    MixedNodeKinds,

    /// A numeric node value is outside its valid domain.
    #[error("Invalid curve value: {reason}")]
    InvalidValue {
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Malformed curve construction.
    #[error("Curve configuration error: {reason}")]
    Config {
        /// Description of the configuration error.
        reason: String,
    },

    /// Error bubbled up from the numerical layer.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Error bubbled up from the core types.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let d1 = Date::from_ymd(2025, 1, 10).unwrap();
        let d2 = Date::from_ymd(2025, 1, 15).unwrap();
        let err = CurveError::DateBeforeSettlement {
            date: d1,
            settlement: d2,
        };
        assert!(err.to_string().contains("precedes"));

        let err = CurveError::config("no nodes supplied");
        assert!(err.to_string().contains("no nodes supplied"));
    }
}
