//! Scalar root-finding algorithms.
//!
//! - [`bisection`]: reliable bracketing method, linear convergence
//! - [`newton_raphson`]: quadratic convergence, needs a derivative
//! - [`newton_bisection`]: Newton iteration inside a bracket with
//!   bisection as safety net - the workhorse for yield solving
//!
//! Root-finders never substitute an approximate answer for a declared
//! failure: exhausting the iteration budget raises
//! [`MathError::ConvergenceFailed`](crate::error::MathError) carrying the
//! last iterate and residual, and the caller decides whether that is good
//! enough.

mod bisection;
mod hybrid;
mod newton;

pub use bisection::bisection;
pub use hybrid::newton_bisection;
pub use newton::{newton_raphson, newton_raphson_numerical};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Tolerance on the residual for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at the root).
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solver_config_builders() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(40);
        assert!((config.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 40);
    }

    #[test]
    fn test_all_solvers_agree_on_yield_like_problem() {
        // Single cash flow of 100 in one year, priced at 95:
        // 100 / (1 + r) - 95 = 0  =>  r = 100/95 - 1
        let f = |r: f64| 100.0 / (1.0 + r) - 95.0;
        let df = |r: f64| -100.0 / ((1.0 + r) * (1.0 + r));
        let config = SolverConfig::default();
        let expected = 100.0 / 95.0 - 1.0;

        let bis = bisection(f, -0.5, 1.0, &config).unwrap();
        let newton = newton_raphson(f, df, 0.04, &config).unwrap();
        let hybrid = newton_bisection(f, 0.04, (-0.5, 1.0), &config).unwrap();

        assert_relative_eq!(bis.root, expected, epsilon = 1e-8);
        assert_relative_eq!(newton.root, expected, epsilon = 1e-10);
        assert_relative_eq!(hybrid.root, expected, epsilon = 1e-10);
    }
}
