//! Error types for bond valuation and calibration.

use andes_core::{CoreError, Date};
use andes_curves::CurveError;
use andes_math::MathError;
use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors raised by bond construction, valuation and calibration.
#[derive(Error, Debug, Clone)]
pub enum BondError {
    /// A coupon violates its construction invariants.
    #[error("Invalid coupon: {reason}")]
    InvalidCoupon {
        /// Description of the violation.
        reason: String,
    },

    /// A coupon schedule is empty or inconsistent.
    #[error("Invalid schedule: {reason}")]
    InvalidSchedule {
        /// Description of the violation.
        reason: String,
    },

    /// No cash flow falls strictly after the valuation date.
    #[error("No cash flows after {date}")]
    NoFutureCashFlows {
        /// The valuation date.
        date: Date,
    },

    /// No coupon period contains the requested date.
    #[error("No coupon accruing at {date}")]
    NoCurrentCoupon {
        /// The requested date.
        date: Date,
    },

    /// Too few observations for the number of free parameters.
    #[error("Underdetermined calibration: {observations} observations for {parameters} parameters")]
    Underdetermined {
        /// Number of usable observations supplied.
        observations: usize,
        /// Number of free parameters.
        parameters: usize,
    },

    /// The calibration optimizer exhausted its budget above tolerance.
    ///
    /// Carries the last parameter iterate so the caller can inspect or
    /// accept the approximate fit.
    #[error(
        "Calibration failed after {iterations} iterations (objective: {objective:.4e}, last iterate: {last:?})"
    )]
    CalibrationFailed {
        /// Iterations used.
        iterations: u32,
        /// Final sum of squared pricing errors.
        objective: f64,
        /// Last parameter vector reached.
        last: Vec<f64>,
    },

    /// Error bubbled up from the core types.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error bubbled up from the numerical layer.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Error bubbled up from the curve layer.
    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl BondError {
    /// Creates an invalid coupon error.
    #[must_use]
    pub fn invalid_coupon(reason: impl Into<String>) -> Self {
        Self::InvalidCoupon {
            reason: reason.into(),
        }
    }

    /// Creates an invalid schedule error.
    #[must_use]
    pub fn invalid_schedule(reason: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            reason: reason.into(),
        }
    }
}
