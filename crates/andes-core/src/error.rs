//! Error types for the Andes core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by core types.
///
/// The variants follow the taxonomy used across the workspace: `Domain` for
/// mathematically invalid input, `Config` for malformed or inconsistent
/// object construction.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Error in date construction or parsing.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Mathematically invalid input (non-positive wealth factor, zero year
    /// fraction against a non-unit factor, ...).
    #[error("Domain error: {reason}")]
    Domain {
        /// Description of the invalid input.
        reason: String,
    },

    /// Malformed or inconsistent object construction.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a domain error.
    #[must_use]
    pub fn domain(reason: impl Into<String>) -> Self {
        Self::Domain {
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
        let err = CoreError::domain("wealth factor -0.5 is not positive");
        assert!(err.to_string().contains("Domain error"));

        let err = CoreError::invalid_date("2024-02-30");
        assert!(err.to_string().contains("Invalid date"));
    }
}
