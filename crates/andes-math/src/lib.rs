//! # Andes Math
//!
//! Numerical utilities for the Andes fixed income analytics library.
//!
//! - **Interpolation**: log-linear and monotone cubic Hermite (PCHIP)
//!   interpolants used by the zero-coupon curve
//! - **Solvers**: scalar root-finders for yield and TERA calculations
//! - **Optimization**: damped least squares (Levenberg-Marquardt) for
//!   parametric curve calibration
//!
//! Everything here works on plain `f64` slices; financial semantics
//! (dates, conventions, discounting) live in the crates above this one.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod optimization;
pub mod solvers;

pub use error::{MathError, MathResult};
pub use interpolation::{CubicHermite, Interpolator, LogLinearInterpolator};
pub use optimization::{levenberg_marquardt, LeastSquaresConfig, LeastSquaresResult};
pub use solvers::{bisection, newton_bisection, newton_raphson, SolverConfig, SolverResult};
