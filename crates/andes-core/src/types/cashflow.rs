//! Cash flow type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// A dated cash flow.
///
/// The valuation engine treats cash flows as opaque inputs: schedule
/// generation (coupon dates, amortization plans) happens upstream and hands
/// the engine plain `(date, amount)` pairs.
///
/// # Example
///
/// ```rust
/// use andes_core::types::{CashFlow, Date};
///
/// let cf = CashFlow::new(Date::from_ymd(2025, 6, 15).unwrap(), 2.5);
/// assert_eq!(cf.amount(), 2.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date.
    date: Date,
    /// Cash flow amount (percentage of notional or absolute, per caller).
    amount: f64,
}

impl CashFlow {
    /// Creates a new cash flow.
    #[must_use]
    pub fn new(date: Date, amount: f64) -> Self {
        Self { date, amount }
    }

    /// Returns the payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the amount.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.amount, self.date)
    }
}
