//! Interest rates and rate conventions.
//!
//! A [`Rate`] couples a numeric value with a [`RateConvention`] describing
//! how the value compounds and how time is measured. All growth arithmetic
//! goes through the wealth factor: the factor by which one unit of currency
//! grows over a period. Converting a rate between conventions preserves the
//! wealth factor, never the numeric value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::daycounts::DayCount;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// How interest compounds over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestConvention {
    /// Simple interest: `wf = 1 + r*t`.
    Linear,
    /// Discrete compounding at frequency `m`: `wf = (1 + r/m)^(m*t)`.
    Compounded,
    /// Continuous compounding: `wf = exp(r*t)`.
    Exponential,
}

impl fmt::Display for InterestConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterestConvention::Linear => "Linear",
            InterestConvention::Compounded => "Compounded",
            InterestConvention::Exponential => "Exponential",
        };
        write!(f, "{name}")
    }
}

/// The compounding and day count semantics of a rate.
///
/// Immutable value object. The compounding `frequency` (periods per year)
/// is only meaningful for [`InterestConvention::Compounded`] and is fixed
/// at 1 for the other kinds.
///
/// # Example
///
/// ```rust
/// use andes_core::daycounts::DayCount;
/// use andes_core::types::RateConvention;
///
/// // The Chilean TERA convention: annually compounded, ACT/365
/// let tera = RateConvention::annual_compounded(DayCount::Act365);
/// assert_eq!(tera.frequency(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConvention {
    interest: InterestConvention,
    frequency: f64,
    day_count: DayCount,
}

impl RateConvention {
    /// Creates a simple-interest convention.
    #[must_use]
    pub fn linear(day_count: DayCount) -> Self {
        Self {
            interest: InterestConvention::Linear,
            frequency: 1.0,
            day_count,
        }
    }

    /// Creates a discretely compounded convention.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` if `frequency` is not a positive finite
    /// number of periods per year.
    pub fn compounded(frequency: f64, day_count: DayCount) -> CoreResult<Self> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(CoreError::config(format!(
                "compounding frequency must be positive, got {frequency}"
            )));
        }
        Ok(Self {
            interest: InterestConvention::Compounded,
            frequency,
            day_count,
        })
    }

    /// Creates an annually compounded convention (frequency 1).
    #[must_use]
    pub fn annual_compounded(day_count: DayCount) -> Self {
        Self {
            interest: InterestConvention::Compounded,
            frequency: 1.0,
            day_count,
        }
    }

    /// Creates a continuously compounded convention.
    #[must_use]
    pub fn exponential(day_count: DayCount) -> Self {
        Self {
            interest: InterestConvention::Exponential,
            frequency: 1.0,
            day_count,
        }
    }

    /// Returns the interest convention kind.
    #[must_use]
    pub fn interest(&self) -> InterestConvention {
        self.interest
    }

    /// Returns the compounding frequency in periods per year.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Returns the day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Year fraction between two dates under this convention's day count.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count.year_fraction(start, end)
    }
}

impl fmt::Display for RateConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interest {
            InterestConvention::Compounded => {
                write!(f, "{} x{} {}", self.interest, self.frequency, self.day_count)
            }
            _ => write!(f, "{} {}", self.interest, self.day_count),
        }
    }
}

/// An interest rate: a value together with its convention.
///
/// # Example
///
/// ```rust
/// use andes_core::daycounts::DayCount;
/// use andes_core::types::{Rate, RateConvention};
///
/// let linear = Rate::new(0.05, RateConvention::linear(DayCount::Act360));
/// let wf = linear.wealth_factor(0.5).unwrap();
/// assert!((wf - 1.025).abs() < 1e-15);
///
/// // Factor-preserving conversion to continuous compounding
/// let cont = linear
///     .convert(RateConvention::exponential(DayCount::Act360), 0.5)
///     .unwrap();
/// assert!((cont.wealth_factor(0.5).unwrap() - wf).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    value: f64,
    convention: RateConvention,
}

impl Rate {
    /// Creates a new rate.
    #[must_use]
    pub fn new(value: f64, convention: RateConvention) -> Self {
        Self { value, convention }
    }

    /// Returns the numeric value (decimal, e.g. 0.05 for 5%).
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the convention.
    #[must_use]
    pub fn convention(&self) -> RateConvention {
        self.convention
    }

    /// Returns a copy of this rate with a different value, same convention.
    #[must_use]
    pub fn with_value(&self, value: f64) -> Self {
        Self {
            value,
            convention: self.convention,
        }
    }

    /// Wealth factor over `year_fraction` years.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Domain` for a compounded rate with
    /// `1 + r/m <= 0` (the power would leave the real line).
    pub fn wealth_factor(&self, year_fraction: f64) -> CoreResult<f64> {
        let r = self.value;
        let t = year_fraction;
        match self.convention.interest {
            InterestConvention::Linear => Ok(1.0 + r * t),
            InterestConvention::Compounded => {
                let m = self.convention.frequency;
                let base = 1.0 + r / m;
                if base <= 0.0 {
                    return Err(CoreError::domain(format!(
                        "compounded rate {r} at frequency {m} has non-positive base {base}"
                    )));
                }
                Ok(base.powf(m * t))
            }
            InterestConvention::Exponential => Ok((r * t).exp()),
        }
    }

    /// Discount factor over `year_fraction` years: `1 / wealth_factor`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Domain` if the wealth factor is not positive.
    pub fn discount_factor(&self, year_fraction: f64) -> CoreResult<f64> {
        let wf = self.wealth_factor(year_fraction)?;
        if wf <= 0.0 {
            return Err(CoreError::domain(format!(
                "wealth factor {wf} is not positive"
            )));
        }
        Ok(1.0 / wf)
    }

    /// Wealth factor between two dates, with the year fraction taken from
    /// this rate's own day count.
    pub fn wealth_factor_between(&self, start: Date, end: Date) -> CoreResult<f64> {
        self.wealth_factor(self.convention.year_fraction(start, end))
    }

    /// Interest accrued on `notional` over `year_fraction` years:
    /// `notional * (wf - 1)`.
    pub fn accrued_interest(&self, notional: f64, year_fraction: f64) -> CoreResult<f64> {
        Ok(notional * (self.wealth_factor(year_fraction)? - 1.0))
    }

    /// Solves the rate value implied by a wealth factor over a period.
    ///
    /// Exact algebraic inverse of [`Rate::wealth_factor`] for each kind.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Domain` if `wealth_factor <= 0`, or if
    /// `year_fraction == 0` with `wealth_factor != 1` (no finite rate can
    /// produce growth over a zero-length period).
    pub fn from_wealth_factor(
        wealth_factor: f64,
        year_fraction: f64,
        convention: RateConvention,
    ) -> CoreResult<Self> {
        if wealth_factor <= 0.0 {
            return Err(CoreError::domain(format!(
                "wealth factor {wealth_factor} is not positive"
            )));
        }
        if year_fraction == 0.0 {
            if wealth_factor == 1.0 {
                return Ok(Self::new(0.0, convention));
            }
            return Err(CoreError::domain(format!(
                "wealth factor {wealth_factor} over a zero year fraction"
            )));
        }

        let wf = wealth_factor;
        let t = year_fraction;
        let value = match convention.interest {
            InterestConvention::Linear => (wf - 1.0) / t,
            InterestConvention::Compounded => {
                let m = convention.frequency;
                m * (wf.powf(1.0 / (m * t)) - 1.0)
            }
            InterestConvention::Exponential => wf.ln() / t,
        };
        Ok(Self::new(value, convention))
    }

    /// Converts this rate to an equivalent rate under `target`, preserving
    /// the wealth factor over `year_fraction` years.
    ///
    /// The same year fraction is applied on both legs; the caller supplies
    /// the externally computed day count fraction rather than having each
    /// leg recompute its own.
    pub fn convert(&self, target: RateConvention, year_fraction: f64) -> CoreResult<Self> {
        let wf = self.wealth_factor(year_fraction)?;
        Self::from_wealth_factor(wf, year_fraction, target)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}% {}", self.value * 100.0, self.convention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn act365() -> DayCount {
        DayCount::Act365
    }

    #[test]
    fn test_linear_wealth_factor() {
        let rate = Rate::new(0.06, RateConvention::linear(act365()));
        assert_relative_eq!(rate.wealth_factor(0.5).unwrap(), 1.03, epsilon = 1e-15);
    }

    #[test]
    fn test_compounded_wealth_factor() {
        let rate = Rate::new(0.05, RateConvention::annual_compounded(act365()));
        assert_relative_eq!(rate.wealth_factor(2.0).unwrap(), 1.1025, epsilon = 1e-12);

        // Semi-annual compounding
        let semi = Rate::new(0.05, RateConvention::compounded(2.0, act365()).unwrap());
        assert_relative_eq!(
            semi.wealth_factor(1.0).unwrap(),
            1.025_f64.powi(2),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_exponential_wealth_factor() {
        let rate = Rate::new(0.05, RateConvention::exponential(act365()));
        assert_relative_eq!(
            rate.wealth_factor(1.0).unwrap(),
            0.05_f64.exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_compounded_domain_error() {
        // 1 + r/m <= 0
        let rate = Rate::new(-1.5, RateConvention::annual_compounded(act365()));
        assert!(rate.wealth_factor(1.0).is_err());
    }

    #[test]
    fn test_invalid_frequency() {
        assert!(RateConvention::compounded(0.0, act365()).is_err());
        assert!(RateConvention::compounded(-2.0, act365()).is_err());
        assert!(RateConvention::compounded(f64::NAN, act365()).is_err());
    }

    #[test]
    fn test_from_wealth_factor_linear() {
        let rate =
            Rate::from_wealth_factor(1.05263157894736842, 1.0, RateConvention::linear(act365()))
                .unwrap();
        assert_relative_eq!(rate.value(), 0.05263157894736842, epsilon = 1e-15);
    }

    #[test]
    fn test_from_wealth_factor_rejects_non_positive() {
        assert!(Rate::from_wealth_factor(0.0, 1.0, RateConvention::linear(act365())).is_err());
        assert!(Rate::from_wealth_factor(-0.5, 1.0, RateConvention::linear(act365())).is_err());
    }

    #[test]
    fn test_from_wealth_factor_zero_period() {
        // wf = 1 over a zero period is a zero rate
        let rate = Rate::from_wealth_factor(1.0, 0.0, RateConvention::linear(act365())).unwrap();
        assert_eq!(rate.value(), 0.0);

        // wf != 1 over a zero period is impossible
        assert!(Rate::from_wealth_factor(1.01, 0.0, RateConvention::linear(act365())).is_err());
    }

    #[test]
    fn test_convert_preserves_wealth_factor() {
        let linear = Rate::new(0.08, RateConvention::linear(act365()));
        let target = RateConvention::compounded(4.0, act365()).unwrap();
        let t = 1.75;

        let converted = linear.convert(target, t).unwrap();
        assert_relative_eq!(
            converted.wealth_factor(t).unwrap(),
            linear.wealth_factor(t).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_convert_round_trip() {
        let conventions = [
            RateConvention::linear(act365()),
            RateConvention::annual_compounded(act365()),
            RateConvention::compounded(2.0, act365()).unwrap(),
            RateConvention::exponential(act365()),
        ];
        let original = Rate::new(0.0475, conventions[0]);

        for &c2 in &conventions[1..] {
            for t in [0.25, 1.0, 3.5] {
                let there = original.convert(c2, t).unwrap();
                let back = there.convert(conventions[0], t).unwrap();
                assert_relative_eq!(back.value(), original.value(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_accrued_interest() {
        let rate = Rate::new(0.05, RateConvention::linear(act365()));
        let accrued = rate.accrued_interest(100.0, 0.5).unwrap();
        assert_relative_eq!(accrued, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_wealth_factor_between() {
        let rate = Rate::new(0.05, RateConvention::linear(DayCount::Act360));
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 7, 1).unwrap();
        let wf = rate.wealth_factor_between(start, end).unwrap();
        assert_relative_eq!(wf, 1.0 + 0.05 * 181.0 / 360.0, epsilon = 1e-15);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn convert_round_trip(
                value in 0.0005_f64..0.25,
                t in 0.05_f64..30.0,
                from in 0_usize..3,
                to in 0_usize..3,
            ) {
                let conventions = [
                    RateConvention::linear(DayCount::Act365),
                    RateConvention::annual_compounded(DayCount::Act365),
                    RateConvention::exponential(DayCount::Act365),
                ];
                let original = Rate::new(value, conventions[from]);
                let there = original.convert(conventions[to], t).unwrap();
                let back = there.convert(conventions[from], t).unwrap();
                prop_assert!((back.value() - original.value()).abs() < 1e-9);
            }

            #[test]
            fn wealth_and_discount_are_inverse(
                value in 0.0005_f64..0.25,
                t in 0.05_f64..30.0,
            ) {
                let rate = Rate::new(value, RateConvention::annual_compounded(DayCount::Act365));
                let wf = rate.wealth_factor(t).unwrap();
                let df = rate.discount_factor(t).unwrap();
                prop_assert!((wf * df - 1.0).abs() < 1e-12);
            }
        }
    }
}
