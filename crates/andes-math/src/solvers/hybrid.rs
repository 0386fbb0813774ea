//! Newton-seeded bracketed root-finding.

use crate::error::MathResult;
use crate::solvers::{bisection, SolverConfig, SolverResult};

/// Newton iteration inside a bracket, with bisection as safety net.
///
/// Runs Newton-Raphson (central finite-difference derivative) from the
/// initial guess for fast convergence on smooth, monotone objectives such
/// as bond price vs. yield. The iteration hands over to [`bisection`] on
/// the supplied bracket as soon as it steps outside it, meets a flat
/// derivative, or stalls. The bracket must contain a sign change; if it
/// does not, the solve fails with
/// [`MathError::InvalidBracket`](crate::error::MathError) rather than
/// returning a guess.
///
/// # Example
///
/// ```rust
/// use andes_math::solvers::{newton_bisection, SolverConfig};
///
/// // Price of a unit zero-coupon bond vs. yield, target 0.95
/// let f = |y: f64| 1.0 / (1.0 + y) - 0.95;
///
/// let result = newton_bisection(f, 0.04, (-0.5, 1.0), &SolverConfig::default()).unwrap();
/// assert!((result.root - (1.0 / 0.95 - 1.0)).abs() < 1e-10);
/// ```
pub fn newton_bisection<F>(
    f: F,
    initial_guess: f64,
    bracket: (f64, f64),
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (lo, hi) = (bracket.0.min(bracket.1), bracket.0.max(bracket.1));
    let h = 1e-8;

    // Newton phase: capped well below the full budget so the bracketed
    // phase always has room to finish
    let newton_budget = config.max_iterations.min(16);
    let mut x = initial_guess.clamp(lo, hi);
    let mut prev_residual = f64::MAX;

    for iteration in 0..newton_budget {
        let fx = f(x);

        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if fx.abs() > prev_residual {
            break; // Diverging: hand over to bisection
        }
        prev_residual = fx.abs();

        let dfx = (f(x + h) - f(x - h)) / (2.0 * h);
        if dfx.abs() < 1e-15 {
            break;
        }

        let next = x - fx / dfx;
        if !next.is_finite() || next < lo || next > hi {
            break;
        }
        x = next;
    }

    bisection(f, lo, hi, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_newton_path_converges() {
        let f = |y: f64| 1.0 / (1.0 + y) - 0.95;
        let result = newton_bisection(f, 0.04, (-0.5, 1.0), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 1.0 / 0.95 - 1.0, epsilon = 1e-10);
        // Newton should have finished before the bisection budget
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_falls_back_to_bisection() {
        // x^(1/3) has an unbounded derivative at the root; Newton overshoots
        let f = |x: f64| x.signum() * x.abs().powf(1.0 / 3.0);
        let result = newton_bisection(f, 0.9, (-1.0, 1.0), &SolverConfig::default()).unwrap();
        assert!(result.root.abs() < 1e-9);
    }

    #[test]
    fn test_guess_outside_bracket_is_clamped() {
        let f = |x: f64| x - 0.5;
        let result = newton_bisection(f, 100.0, (0.0, 1.0), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x + 1.0;
        let err = newton_bisection(f, 0.0, (-1.0, 1.0), &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, MathError::InvalidBracket { .. }));
    }
}
