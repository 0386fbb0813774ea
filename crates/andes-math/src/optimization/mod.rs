//! Nonlinear least squares.
//!
//! A damped Gauss-Newton (Levenberg-Marquardt) minimizer for small dense
//! problems such as parametric curve calibration: a handful of parameters,
//! a few dozen residuals, numerical Jacobian.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Configuration for the least-squares minimizer.
#[derive(Debug, Clone, Copy)]
pub struct LeastSquaresConfig {
    /// Convergence threshold on the objective (sum of squared residuals).
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Initial Levenberg-Marquardt damping parameter.
    pub initial_lambda: f64,
    /// Multiplicative damping adjustment per accepted/rejected step.
    pub lambda_factor: f64,
    /// Lower bound on the damping parameter.
    pub min_lambda: f64,
    /// Upper bound on the damping parameter; reaching it aborts the search.
    pub max_lambda: f64,
    /// Finite-difference step for the numerical Jacobian.
    pub jacobian_step: f64,
}

impl Default for LeastSquaresConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 200,
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            jacobian_step: 1e-6,
        }
    }
}

impl LeastSquaresConfig {
    /// Sets the objective tolerance.
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

/// Result of a least-squares run.
///
/// `converged` reports whether the minimizer met its objective tolerance;
/// callers turn a `false` into their own convergence error, keeping the
/// last iterate available for diagnostics.
#[derive(Debug, Clone)]
pub struct LeastSquaresResult {
    /// Final parameter vector (the last iterate, converged or not).
    pub parameters: Vec<f64>,
    /// Residuals at the final parameters.
    pub residuals: Vec<f64>,
    /// Final objective: sum of squared residuals.
    pub objective: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the run met its objective tolerance.
    pub converged: bool,
}

/// Minimizes the sum of squared residuals over the parameter vector.
///
/// `residuals_fn` maps a parameter slice to the residual vector; the
/// Jacobian is estimated by central differences. When `bounds` are given,
/// every trial step is clamped componentwise into its box, so the residual
/// function is never evaluated outside the feasible region.
///
/// # Errors
///
/// Returns [`MathError::InsufficientData`] when there are fewer residuals
/// than parameters (underdetermined system), or
/// [`MathError::InvalidInput`] for an empty parameter vector or
/// mismatched bounds.
///
/// # Example
///
/// ```rust
/// use andes_math::optimization::{levenberg_marquardt, LeastSquaresConfig};
///
/// // Fit y = a * exp(b * x) through three points
/// let data = [(0.0, 2.0), (1.0, 2.0 * 0.5_f64.exp()), (2.0, 2.0 * 1.0_f64.exp())];
/// let residuals = |p: &[f64]| {
///     data.iter().map(|(x, y)| p[0] * (p[1] * x).exp() - y).collect::<Vec<_>>()
/// };
///
/// let result =
///     levenberg_marquardt(residuals, &[1.0, 0.1], None, &LeastSquaresConfig::default()).unwrap();
/// assert!(result.converged);
/// assert!((result.parameters[0] - 2.0).abs() < 1e-6);
/// assert!((result.parameters[1] - 0.5).abs() < 1e-6);
/// ```
pub fn levenberg_marquardt<F>(
    residuals_fn: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &LeastSquaresConfig,
) -> MathResult<LeastSquaresResult>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::invalid_input("empty parameter vector"));
    }
    if let Some(b) = bounds {
        if b.len() != n {
            return Err(MathError::invalid_input(format!(
                "bounds length {} does not match parameter count {n}",
                b.len()
            )));
        }
    }

    let clamp = |p: &mut [f64]| {
        if let Some(b) = bounds {
            for (value, &(lo, hi)) in p.iter_mut().zip(b) {
                *value = value.clamp(lo, hi);
            }
        }
    };

    let mut params = initial.to_vec();
    clamp(&mut params);

    let mut residuals = residuals_fn(&params);
    let m = residuals.len();
    if m < n {
        return Err(MathError::insufficient_data(n, m));
    }

    let mut objective = sum_of_squares(&residuals);
    let mut lambda = config.initial_lambda;
    let mut plateau = 0u32;
    let mut iterations = 0;

    for iteration in 0..config.max_iterations {
        iterations = iteration + 1;

        if objective < config.tolerance {
            return Ok(finish(params, residuals, objective, iterations, true));
        }

        let jacobian = numerical_jacobian(&residuals_fn, &params, m, config.jacobian_step);
        let jt = jacobian.transpose();
        let jtj = &jt * &jacobian;
        let jtr = &jt * DVector::from_column_slice(&residuals);

        // Damped normal equations: (J'J + lambda I) delta = J'r
        let damped = &jtj + DMatrix::identity(n, n) * lambda;
        let delta = match damped.lu().solve(&jtr) {
            Some(d) => d,
            None => {
                lambda *= config.lambda_factor;
                continue;
            }
        };

        let mut trial: Vec<f64> = params
            .iter()
            .zip(delta.iter())
            .map(|(p, d)| p - d)
            .collect();
        clamp(&mut trial);

        let trial_residuals = residuals_fn(&trial);
        let trial_objective = sum_of_squares(&trial_residuals);

        if trial_objective < objective {
            let improvement = objective - trial_objective;
            params = trial;
            residuals = trial_residuals;
            objective = trial_objective;
            lambda = (lambda / config.lambda_factor).max(config.min_lambda);

            // A stationary plateau ends the search; whether that counts as
            // success depends on the objective actually meeting tolerance
            if improvement < 1e-14 * (1.0 + objective) {
                plateau += 1;
                if plateau >= 3 {
                    let converged = objective < config.tolerance;
                    return Ok(finish(params, residuals, objective, iterations, converged));
                }
            } else {
                plateau = 0;
            }
        } else {
            lambda *= config.lambda_factor;
            if lambda > config.max_lambda {
                debug!(
                    "lm aborted at iteration {iterations}: damping exhausted, objective {objective:.6e}"
                );
                return Ok(finish(params, residuals, objective, iterations, false));
            }
        }

        debug!("lm iteration {iterations}: objective {objective:.6e}, lambda {lambda:.1e}");
    }

    let converged = objective < config.tolerance;
    Ok(finish(params, residuals, objective, iterations, converged))
}

fn finish(
    parameters: Vec<f64>,
    residuals: Vec<f64>,
    objective: f64,
    iterations: u32,
    converged: bool,
) -> LeastSquaresResult {
    LeastSquaresResult {
        parameters,
        residuals,
        objective,
        iterations,
        converged,
    }
}

fn sum_of_squares(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r * r).sum()
}

/// Central-difference Jacobian of the residual vector.
fn numerical_jacobian<F>(residuals_fn: &F, params: &[f64], m: usize, step: f64) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n = params.len();
    let mut jacobian = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut up = params.to_vec();
        let mut down = params.to_vec();
        up[j] += step;
        down[j] -= step;

        let r_up = residuals_fn(&up);
        let r_down = residuals_fn(&down);

        for i in 0..m {
            jacobian[(i, j)] = (r_up[i] - r_down[i]) / (2.0 * step);
        }
    }

    jacobian
}
