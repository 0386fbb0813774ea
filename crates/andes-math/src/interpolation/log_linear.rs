//! Log-linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Log-linear interpolation between data points.
///
/// Interpolates the natural logarithm of the y values linearly, then
/// exponentiates. On discount factors this yields a geometric mean between
/// nodes and makes the forward rate piecewise constant on each segment.
///
/// # Example
///
/// ```rust
/// use andes_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let times = vec![0.0, 1.0];
/// let dfs = vec![1.0, 0.95];
///
/// let interp = LogLinearInterpolator::new(times, dfs).unwrap();
/// // Geometric mean at the midpoint
/// let df = interp.interpolate(0.5).unwrap();
/// assert!((df - 0.95_f64.sqrt()).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, the lengths
    /// differ, the x values are not strictly increasing, or any y value is
    /// non-positive.
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

        let log_ys = ys
            .iter()
            .enumerate()
            .map(|(i, &y)| {
                if y > 0.0 {
                    Ok(y.ln())
                } else {
                    Err(MathError::invalid_input(format!(
                        "y[{i}] = {y} is not positive; log-linear requires positive values"
                    )))
                }
            })
            .collect::<MathResult<Vec<f64>>>()?;

        Ok(Self {
            xs,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Index i of the segment [xs[i], xs[i+1]] containing x, clamped to the
    /// outermost segments for out-of-range queries.
    fn segment(&self, x: f64) -> usize {
        let upper = self.xs.partition_point(|&p| p <= x);
        upper.saturating_sub(1).min(self.xs.len() - 2)
    }

    fn check_range(&self, x: f64) -> MathResult<()> {
        if !self.allow_extrapolation && !(self.min_x()..=self.max_x()).contains(&x) {
            return Err(MathError::ExtrapolationNotAllowed {
                x,
                min: self.min_x(),
                max: self.max_x(),
            });
        }
        Ok(())
    }

    /// Interpolated log-value and local slope at x.
    fn log_value_and_slope(&self, x: f64) -> (f64, f64) {
        let i = self.segment(x);
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i]);
        let log_y = self.log_ys[i] + slope * (x - self.xs[i]);
        (log_y, slope)
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        let (log_y, _) = self.log_value_and_slope(x);
        Ok(log_y.exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.check_range(x)?;
        // y(x) = exp(g(x)) with g piecewise linear, so y' = y * g'
        let (log_y, slope) = self.log_value_and_slope(x);
        Ok(log_y.exp() * slope)
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
