//! Monotone cubic Hermite interpolation (PCHIP).

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Piecewise cubic Hermite interpolation with Fritsch-Carlson slopes.
///
/// The node slopes are chosen so the interpolant preserves the
/// monotonicity of the data on every segment: where the data are
/// decreasing (as log-discount-factors are), the interpolant never
/// overshoots the way a natural cubic spline can. The result is C1 and
/// passes exactly through every node.
///
/// # Example
///
/// ```rust
/// use andes_math::interpolation::{CubicHermite, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 5.0];
/// let ys = vec![0.0, -0.04, -0.09, -0.25];
///
/// let interp = CubicHermite::new(xs, ys).unwrap();
/// let y = interp.interpolate(1.5).unwrap();
/// assert!(y < -0.04 && y > -0.09);
/// ```
#[derive(Debug, Clone)]
pub struct CubicHermite {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Node slopes after monotonicity limiting.
    slopes: Vec<f64>,
}

impl CubicHermite {
    /// Creates a new monotone cubic Hermite interpolant.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, the lengths
    /// differ, or the x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }

        let slopes = fritsch_carlson_slopes(&xs, &ys);
        Ok(Self { xs, ys, slopes })
    }

    fn segment(&self, x: f64) -> usize {
        let upper = self.xs.partition_point(|&p| p <= x);
        upper.saturating_sub(1).min(self.xs.len() - 2)
    }

    fn check_range(&self, x: f64) -> MathResult<()> {
        if !(self.min_x()..=self.max_x()).contains(&x) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }
        Ok(())
    }
}

impl Interpolator for CubicHermite {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let i = self.segment(x);

        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        // Hermite basis
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Ok(h00 * self.ys[i]
            + h10 * h * self.slopes[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.slopes[i + 1])
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let i = self.segment(x);

        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;

        // Derivatives of the Hermite basis, chain rule through t = (x-x0)/h
        let dh00 = (6.0 * t2 - 6.0 * t) / h;
        let dh10 = 3.0 * t2 - 4.0 * t + 1.0;
        let dh01 = (-6.0 * t2 + 6.0 * t) / h;
        let dh11 = 3.0 * t2 - 2.0 * t;

        Ok(dh00 * self.ys[i]
            + dh10 * self.slopes[i]
            + dh01 * self.ys[i + 1]
            + dh11 * self.slopes[i + 1])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// Fritsch-Carlson monotone slope selection.
///
/// Interior slopes are a weighted harmonic mean of adjacent secants, zeroed
/// at local extrema; endpoint slopes use the one-sided three-point formula
/// with the usual monotonicity limiting.
fn fritsch_carlson_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = ys
        .windows(2)
        .zip(h.iter())
        .map(|(w, &hi)| (w[1] - w[0]) / hi)
        .collect();

    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut slopes = vec![0.0; n];
    for i in 1..n - 1 {
        let (d0, d1) = (delta[i - 1], delta[i]);
        if d0 * d1 <= 0.0 {
            // Local extremum: flat slope keeps the interpolant monotone
            slopes[i] = 0.0;
        } else {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            slopes[i] = (w1 + w2) / (w1 / d0 + w2 / d1);
        }
    }

    slopes[0] = endpoint_slope(h[0], h[1], delta[0], delta[1]);
    slopes[n - 1] = endpoint_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);

    slopes
}

/// One-sided three-point endpoint slope with monotonicity limiting.
fn endpoint_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let m = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
    if m * d0 <= 0.0 {
        0.0
    } else if d0 * d1 < 0.0 && m.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_passes_through_nodes() {
        let xs = vec![0.0, 0.5, 1.5, 3.0, 6.0];
        let ys = vec![0.0, -0.02, -0.065, -0.14, -0.31];
        let interp = CubicHermite::new(xs.clone(), ys.clone()).unwrap();

        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(interp.interpolate(*x).unwrap(), *y, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_monotone_on_decreasing_data() {
        // Log-discount-factors: strictly decreasing with uneven spacing
        let xs = vec![0.0, 0.25, 1.0, 2.0, 10.0];
        let ys = vec![0.0, -0.01, -0.045, -0.1, -0.48];
        let interp = CubicHermite::new(xs, ys).unwrap();

        let mut prev = interp.interpolate(0.0).unwrap();
        let mut x = 0.05;
        while x < 10.0 {
            let y = interp.interpolate(x).unwrap();
            assert!(y <= prev + 1e-12, "not monotone at x = {x}: {y} > {prev}");
            prev = y;
            x += 0.05;
        }
    }

    #[test]
    fn test_two_points_is_linear() {
        let interp = CubicHermite::new(vec![0.0, 2.0], vec![1.0, 3.0]).unwrap();
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 2.0, epsilon = 1e-14);
        assert_relative_eq!(interp.derivative(0.5).unwrap(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_flat_at_local_extremum() {
        // Data with a hump: slope at the peak node must be zero
        let interp =
            CubicHermite::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 0.5, 0.8]).unwrap();
        assert_relative_eq!(interp.derivative(1.0).unwrap(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_derivative_matches_numerical() {
        let interp = CubicHermite::new(
            vec![0.0, 1.0, 2.0, 4.0, 7.0],
            vec![0.0, -0.04, -0.085, -0.18, -0.33],
        )
        .unwrap();
        for x in [0.3, 1.5, 3.2, 6.1] {
            let h = 1e-6;
            let numerical = (interp.interpolate(x + h).unwrap()
                - interp.interpolate(x - h).unwrap())
                / (2.0 * h);
            assert_relative_eq!(interp.derivative(x).unwrap(), numerical, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_no_extrapolation() {
        let interp = CubicHermite::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert!(interp.interpolate(1.5).is_err());
        assert!(interp.interpolate(-0.1).is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(CubicHermite::new(vec![0.0], vec![1.0]).is_err());
        assert!(CubicHermite::new(vec![0.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
        assert!(CubicHermite::new(vec![0.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
    }
}
