//! Money-market deposit valuation.

use serde::{Deserialize, Serialize};

use andes_core::{DayCount, Date, Rate, RateConvention};

use crate::error::{BondError, BondResult};

/// A single-flow deposit: one payment at one date.
///
/// Deposits carry their market's quoting convention. Chilean peso
/// deposits quote a monthly rate (Linear ACT/30); dollar deposits quote
/// Linear ACT/360.
///
/// # Example
///
/// ```rust
/// use andes_bonds::Deposit;
/// use andes_core::Date;
///
/// let today = Date::from_ymd(2025, 3, 14).unwrap();
/// let deposit = Deposit::clp(today.add_days(90), 105.0).unwrap();
///
/// // 0.5% monthly over three 30-day months
/// let value = deposit.value(today, 0.005).unwrap();
/// assert!((value - 105.0 / 1.015).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    payment_date: Date,
    payment: f64,
    convention: RateConvention,
}

impl Deposit {
    /// Creates a deposit with an explicit quoting convention.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::InvalidSchedule`] if the payment is not a
    /// positive finite number.
    pub fn new(
        payment_date: Date,
        payment: f64,
        convention: RateConvention,
    ) -> BondResult<Self> {
        if !payment.is_finite() || payment <= 0.0 {
            return Err(BondError::invalid_schedule(format!(
                "deposit payment {payment} must be a positive finite number"
            )));
        }
        Ok(Self {
            payment_date,
            payment,
            convention,
        })
    }

    /// Chilean peso deposit: monthly rate, Linear ACT/30.
    pub fn clp(payment_date: Date, payment: f64) -> BondResult<Self> {
        Self::new(
            payment_date,
            payment,
            RateConvention::linear(DayCount::Act30),
        )
    }

    /// Dollar deposit: Linear ACT/360.
    pub fn usd(payment_date: Date, payment: f64) -> BondResult<Self> {
        Self::new(
            payment_date,
            payment,
            RateConvention::linear(DayCount::Act360),
        )
    }

    /// Returns the payment date.
    #[must_use]
    pub fn payment_date(&self) -> Date {
        self.payment_date
    }

    /// Returns the payment amount.
    #[must_use]
    pub fn payment(&self) -> f64 {
        self.payment
    }

    /// Returns the quoting convention.
    #[must_use]
    pub fn convention(&self) -> RateConvention {
        self.convention
    }

    /// Present value at `date` for a quoted rate value.
    pub fn value(&self, date: Date, rate_value: f64) -> BondResult<f64> {
        let rate = Rate::new(rate_value, self.convention);
        let yf = self.convention.year_fraction(date, self.payment_date);
        Ok(self.payment * rate.discount_factor(yf)?)
    }

    /// Time to payment in ACT/365 years.
    #[must_use]
    pub fn duration(&self, date: Date) -> f64 {
        DayCount::Act365.year_fraction(date, self.payment_date)
    }

    /// DV01 at `date` for a quoted rate value: value under the quoted
    /// rate minus value under the rate one basis point higher. Positive
    /// for any future payment, consistent with the bond DV01 convention.
    pub fn dv01(&self, date: Date, rate_value: f64) -> BondResult<f64> {
        let base = self.value(date, rate_value)?;
        let bumped = self.value(date, rate_value + 1e-4)?;
        Ok(base - bumped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_clp_deposit_monthly_rate() {
        let today = d(2025, 3, 14);
        let deposit = Deposit::clp(today.add_days(90), 105.0).unwrap();
        // Three 30-day months at 0.5% per month, linear
        assert_relative_eq!(
            deposit.value(today, 0.005).unwrap(),
            105.0 / (1.0 + 0.005 * 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_usd_deposit_act360() {
        let today = d(2025, 3, 14);
        let deposit = Deposit::usd(today.add_days(180), 100.0).unwrap();
        assert_relative_eq!(
            deposit.value(today, 0.05).unwrap(),
            100.0 / (1.0 + 0.05 * 0.5),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_duration_act365() {
        let today = d(2025, 3, 14);
        let deposit = Deposit::clp(today.add_days(73), 100.0).unwrap();
        assert_relative_eq!(deposit.duration(today), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_dv01_positive() {
        let today = d(2025, 3, 14);
        let deposit = Deposit::clp(today.add_days(90), 1_000_000.0).unwrap();
        let dv01 = deposit.dv01(today, 0.005).unwrap();
        assert!(dv01 > 0.0);
        // Approximately payment * t * 1bp for small rates
        assert_relative_eq!(dv01, 1_000_000.0 * 3.0 * 1e-4, max_relative = 0.05);
    }

    #[test]
    fn test_rejects_non_positive_payment() {
        let today = d(2025, 3, 14);
        assert!(Deposit::clp(today, 0.0).is_err());
        assert!(Deposit::clp(today, f64::NAN).is_err());
    }
}
