//! Interpolation methods for discount curve construction.
//!
//! Two interpolants are provided, both chosen for their behavior on
//! log-discount-factor data:
//!
//! - [`LogLinearInterpolator`]: linear in the logarithm of the values.
//!   Guarantees positive output and piecewise-constant forward rates
//!   between nodes.
//! - [`CubicHermite`]: monotonicity-preserving piecewise cubic Hermite
//!   (PCHIP, Fritsch-Carlson slopes). Smooth (C1) and free of the
//!   overshoot a natural cubic spline produces on curve data.
//!
//! Both pass exactly through every data point.

mod hermite;
mod log_linear;

pub use hermite::CubicHermite;
pub use log_linear::LogLinearInterpolator;

use crate::error::MathResult;

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns true if extrapolation beyond the data range is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}
