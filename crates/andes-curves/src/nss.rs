//! Nelson-Siegel-Svensson parametric zero-rate model.

use serde::{Deserialize, Serialize};

use andes_core::{DayCount, Date};

use crate::curve::ZeroCouponCurve;
use crate::error::{CurveError, CurveResult};

/// The six Nelson-Siegel-Svensson parameters.
///
/// The zero rate at time `t` (continuously compounded, Act/365 years) is
///
/// ```text
/// z(t) = b0 + b1 * L1(lambda*t) + b2 * L2(lambda*t) + b3 * L2(mu*t)
/// L1(x) = (1 - e^(-x)) / x
/// L2(x) = L1(x) - e^(-x)
/// ```
///
/// `b0` is the long-end level, `b0 + b1` the instantaneous short rate,
/// `b2`/`b3` the two hump components with decay speeds `lambda` and `mu`.
/// Both decay speeds must be positive: at `lambda <= 0` or `mu <= 0` the
/// basis degenerates, so construction rejects them outright.
///
/// Instances come out of the calibrator in `andes-bonds` or are built
/// directly from known parameters; they are immutable.
///
/// # Example
///
/// ```rust
/// use andes_curves::NssParameters;
///
/// let params = NssParameters::new(0.045, -0.02, 0.01, 0.005, 0.5, 0.2).unwrap();
///
/// // Long end converges to b0
/// assert!((params.zero_rate(200.0) - 0.045).abs() < 1e-3);
/// // Short end converges to b0 + b1
/// assert!((params.zero_rate(1e-9) - 0.025).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NssParameters {
    beta0: f64,
    beta1: f64,
    beta2: f64,
    beta3: f64,
    lambda: f64,
    mu: f64,
}

impl NssParameters {
    /// Creates a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidValue`] unless `lambda` and `mu` are
    /// positive finite numbers.
    pub fn new(
        beta0: f64,
        beta1: f64,
        beta2: f64,
        beta3: f64,
        lambda: f64,
        mu: f64,
    ) -> CurveResult<Self> {
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "lambda must be positive, got {lambda}"
            )));
        }
        if !mu.is_finite() || mu <= 0.0 {
            return Err(CurveError::invalid_value(format!(
                "mu must be positive, got {mu}"
            )));
        }
        Ok(Self {
            beta0,
            beta1,
            beta2,
            beta3,
            lambda,
            mu,
        })
    }

    /// Builds a parameter set from a `[b0, b1, b2, b3, lambda, mu]` array.
    pub fn from_array(values: [f64; 6]) -> CurveResult<Self> {
        Self::new(
            values[0], values[1], values[2], values[3], values[4], values[5],
        )
    }

    /// Returns the parameters as `[b0, b1, b2, b3, lambda, mu]`.
    #[must_use]
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.beta0, self.beta1, self.beta2, self.beta3, self.lambda, self.mu,
        ]
    }

    /// Returns the long-end level `b0`.
    #[must_use]
    pub fn beta0(&self) -> f64 {
        self.beta0
    }

    /// Returns the slope component `b1`.
    #[must_use]
    pub fn beta1(&self) -> f64 {
        self.beta1
    }

    /// Returns the first hump component `b2`.
    #[must_use]
    pub fn beta2(&self) -> f64 {
        self.beta2
    }

    /// Returns the second hump component `b3`.
    #[must_use]
    pub fn beta3(&self) -> f64 {
        self.beta3
    }

    /// Returns the first decay speed.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Returns the second decay speed.
    #[must_use]
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Zero rate at `t` years (continuously compounded, Act/365 axis).
    ///
    /// `t <= 0` returns the short-end limit `b0 + b1`.
    #[must_use]
    pub fn zero_rate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.beta0 + self.beta1;
        }
        let x1 = self.lambda * t;
        let x2 = self.mu * t;
        self.beta0
            + self.beta1 * loading_factor_1(x1)
            + self.beta2 * loading_factor_2(x1)
            + self.beta3 * loading_factor_2(x2)
    }

    /// Discount factor at `t` years: `exp(-z(t) * t)`.
    #[must_use]
    pub fn discount_factor(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-self.zero_rate(t) * t).exp()
    }

    /// Materializes the model as a [`ZeroCouponCurve`].
    ///
    /// Evaluates the discount factor at each horizon date (Act/365 years
    /// from settlement) and builds a log-linear curve on those nodes.
    /// Horizon dates must be distinct and after the settlement date.
    pub fn to_curve(&self, settlement: Date, horizon: &[Date]) -> CurveResult<ZeroCouponCurve> {
        let mut builder = ZeroCouponCurve::builder().settlement(settlement);
        for &date in horizon {
            let t = DayCount::Act365.year_fraction(settlement, date);
            builder = builder.add_discount_factor(date, self.discount_factor(t));
        }
        builder.build()
    }
}

/// `(1 - e^(-x)) / x`, Taylor-expanded near zero for stability.
fn loading_factor_1(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        1.0 - x / 2.0 + x * x / 6.0
    } else {
        (1.0 - (-x).exp()) / x
    }
}

/// `(1 - e^(-x)) / x - e^(-x)`, Taylor-expanded near zero.
fn loading_factor_2(x: f64) -> f64 {
    if x.abs() < 1e-10 {
        x / 2.0 - x * x / 3.0
    } else {
        loading_factor_1(x) - (-x).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> NssParameters {
        NssParameters::new(0.045, -0.02, 0.01, 0.005, 0.5, 0.2).unwrap()
    }

    #[test]
    fn test_long_end_converges_to_beta0() {
        assert_relative_eq!(sample().zero_rate(500.0), 0.045, epsilon = 1e-3);
    }

    #[test]
    fn test_short_end_converges_to_level_plus_slope() {
        let params = sample();
        assert_relative_eq!(params.zero_rate(1e-12), 0.025, epsilon = 1e-9);
        assert_relative_eq!(params.zero_rate(0.0), 0.025, epsilon = 1e-15);
    }

    #[test]
    fn test_upward_slope_with_negative_beta1() {
        let params = sample();
        assert!(params.zero_rate(0.5) < params.zero_rate(10.0));
    }

    #[test]
    fn test_rejects_non_positive_decay() {
        assert!(NssParameters::new(0.04, 0.0, 0.0, 0.0, 0.0, 0.2).is_err());
        assert!(NssParameters::new(0.04, 0.0, 0.0, 0.0, 0.5, -0.1).is_err());
        assert!(NssParameters::new(0.04, 0.0, 0.0, 0.0, f64::NAN, 0.2).is_err());
    }

    #[test]
    fn test_reduces_to_nelson_siegel_when_beta3_zero() {
        // With b3 = 0 the mu term drops out entirely
        let a = NssParameters::new(0.045, -0.02, 0.01, 0.0, 0.5, 0.2).unwrap();
        let b = NssParameters::new(0.045, -0.02, 0.01, 0.0, 0.5, 0.9).unwrap();
        for t in [0.5, 1.0, 2.0, 5.0, 10.0] {
            assert_relative_eq!(a.zero_rate(t), b.zero_rate(t), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_discount_factor_at_origin_is_one() {
        assert_eq!(sample().discount_factor(0.0), 1.0);
        assert_eq!(sample().discount_factor(-1.0), 1.0);
    }

    #[test]
    fn test_loading_factors_stable_near_zero() {
        // The closed form and the expansion must agree at the crossover
        let x = 1e-10;
        assert_relative_eq!(
            loading_factor_1(x),
            (1.0 - (-x).exp()) / x,
            epsilon = 1e-9
        );
        assert_relative_eq!(loading_factor_1(0.0), 1.0, epsilon = 1e-15);
        assert_relative_eq!(loading_factor_2(0.0), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_to_curve_reprices_model_discount_factors() {
        let params = sample();
        let settlement = Date::from_ymd(2025, 3, 14).unwrap();
        let horizon: Vec<Date> = (1..=10)
            .map(|i| settlement.add_years(i).unwrap())
            .collect();

        let curve = params.to_curve(settlement, &horizon).unwrap();

        for &date in &horizon {
            let t = DayCount::Act365.year_fraction(settlement, date);
            assert_eq!(
                curve.discount_factor(date).unwrap(),
                params.discount_factor(t)
            );
        }
    }

    #[test]
    fn test_to_curve_serde_parameters_roundtrip() {
        let params = sample();
        let json = serde_json::to_string(&params).unwrap();
        let back: NssParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
