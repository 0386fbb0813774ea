//! Day count conventions for fixed income calculations.
//!
//! Day count conventions determine how interest accrues by specifying how to
//! count days between two dates and the year basis. The engine consumes them
//! through a single narrow entry point, [`DayCount::year_fraction`].
//!
//! # Supported Conventions
//!
//! - [`DayCount::Act360`]: Actual/360 - money market convention
//! - [`DayCount::Act365`]: Actual/365 Fixed - Chilean local market basis
//! - [`DayCount::Act30`]: Actual/30 - Chilean deposit (monthly rate) basis
//! - [`DayCount::ActActIsda`]: Actual/Actual ISDA - year-based split
//! - [`DayCount::Thirty360US`]: 30/360 US bond basis (with February
//!   end-of-month rules)
//! - [`DayCount::Thirty360E`]: 30E/360 - Eurobond convention
//! - [`DayCount::Thirty360Isda`]: 30E/360 ISDA
//!
//! Conventions are a closed enum dispatched by `match`; there is no open
//! extension point, which keeps [`crate::types::RateConvention`] a plain
//! copyable value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Date;

/// A day count convention.
///
/// # Example
///
/// ```rust
/// use andes_core::daycounts::DayCount;
/// use andes_core::types::Date;
///
/// let start = Date::from_ymd(2025, 1, 15).unwrap();
/// let end = Date::from_ymd(2025, 7, 15).unwrap();
///
/// assert_eq!(DayCount::Thirty360E.day_count(start, end), 180);
/// let yf = DayCount::Act360.year_fraction(start, end);
/// assert!((yf - 181.0 / 360.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCount {
    /// Actual/360 - money market instruments.
    Act360,
    /// Actual/365 Fixed - the Chilean fixed income basis.
    Act365,
    /// Actual/30 - Chilean deposit basis (rates quoted per 30-day month).
    Act30,
    /// Actual/Actual ISDA - actual days over actual year lengths.
    ActActIsda,
    /// 30/360 US (bond basis) with February end-of-month rules.
    Thirty360US,
    /// 30E/360 (Eurobond basis).
    Thirty360E,
    /// 30E/360 ISDA (end-of-month days counted as 30).
    Thirty360Isda,
}

impl DayCount {
    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCount::Act360 => "ACT/360",
            DayCount::Act365 => "ACT/365",
            DayCount::Act30 => "ACT/30",
            DayCount::ActActIsda => "ACT/ACT ISDA",
            DayCount::Thirty360US => "30/360 US",
            DayCount::Thirty360E => "30E/360",
            DayCount::Thirty360Isda => "30E/360 ISDA",
        }
    }

    /// Counts days from `start` to `end` according to the convention.
    ///
    /// Actual conventions count calendar days; the 30/360 family applies the
    /// usual day-of-month adjustments. Negative when `end` precedes `start`.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date) -> i64 {
        match self {
            DayCount::Act360 | DayCount::Act365 | DayCount::Act30 | DayCount::ActActIsda => {
                start.days_between(&end)
            }
            DayCount::Thirty360US => {
                let (mut d1, mut d2) = (start.day() as i64, end.day() as i64);
                if is_last_day_of_february(start) {
                    if is_last_day_of_february(end) {
                        d2 = 30;
                    }
                    d1 = 30;
                }
                if d2 == 31 && d1 >= 30 {
                    d2 = 30;
                }
                if d1 == 31 {
                    d1 = 30;
                }
                thirty_360(start, end, d1, d2)
            }
            DayCount::Thirty360E => {
                let d1 = (start.day() as i64).min(30);
                let d2 = (end.day() as i64).min(30);
                thirty_360(start, end, d1, d2)
            }
            DayCount::Thirty360Isda => {
                let d1 = if is_last_day_of_month(start) {
                    30
                } else {
                    start.day() as i64
                };
                let d2 = if is_last_day_of_month(end) {
                    30
                } else {
                    end.day() as i64
                };
                thirty_360(start, end, d1, d2)
            }
        }
    }

    /// Returns the year fraction from `start` to `end`.
    ///
    /// Negative when `end` precedes `start`.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCount::Act360 => self.day_count(start, end) as f64 / 360.0,
            DayCount::Act365 => self.day_count(start, end) as f64 / 365.0,
            DayCount::Act30 => self.day_count(start, end) as f64 / 30.0,
            DayCount::ActActIsda => act_act_isda(start, end),
            DayCount::Thirty360US | DayCount::Thirty360E | DayCount::Thirty360Isda => {
                self.day_count(start, end) as f64 / 360.0
            }
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 30/360 core formula with pre-adjusted day-of-month values.
fn thirty_360(start: Date, end: Date, d1: i64, d2: i64) -> i64 {
    360 * i64::from(end.year() - start.year())
        + 30 * (i64::from(end.month()) - i64::from(start.month()))
        + (d2 - d1)
}

fn is_last_day_of_month(date: Date) -> bool {
    date.add_days(1).month() != date.month()
}

fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && is_last_day_of_month(date)
}

/// ACT/ACT ISDA: actual days in each calendar year over that year's length.
fn act_act_isda(start: Date, end: Date) -> f64 {
    if start == end {
        return 0.0;
    }
    if end < start {
        return -act_act_isda(end, start);
    }

    if start.year() == end.year() {
        return start.days_between(&end) as f64 / f64::from(start.days_in_year());
    }

    // Stub periods in the first and last year, whole years in between
    let first = f64::from(start.days_in_year() - start.day_of_year() + 1)
        / f64::from(start.days_in_year());
    let last = f64::from(end.day_of_year() - 1) / f64::from(end.days_in_year());
    let whole_years = f64::from(end.year() - start.year() - 1);

    first + whole_years + last
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_act360() {
        let yf = DayCount::Act360.year_fraction(d(2025, 1, 1), d(2025, 7, 1));
        assert_relative_eq!(yf, 181.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn test_act365() {
        let yf = DayCount::Act365.year_fraction(d(2025, 1, 1), d(2026, 1, 1));
        assert_relative_eq!(yf, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_act30_deposit_basis() {
        // A 90-day Chilean deposit accrues three months of the monthly rate
        let yf = DayCount::Act30.year_fraction(d(2025, 1, 10), d(2025, 4, 10));
        assert_relative_eq!(yf, 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_act365_negative() {
        let yf = DayCount::Act365.year_fraction(d(2026, 1, 1), d(2025, 1, 1));
        assert_relative_eq!(yf, -1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_act_act_isda_same_year() {
        // 2024 is a leap year
        let yf = DayCount::ActActIsda.year_fraction(d(2024, 1, 1), d(2024, 7, 1));
        assert_relative_eq!(yf, 182.0 / 366.0, epsilon = 1e-15);
    }

    #[test]
    fn test_act_act_isda_across_years() {
        let yf = DayCount::ActActIsda.year_fraction(d(2023, 7, 1), d(2024, 7, 1));
        let expected = 184.0 / 365.0 + 182.0 / 366.0;
        assert_relative_eq!(yf, expected, epsilon = 1e-15);
    }

    #[test]
    fn test_act_act_isda_whole_years() {
        let yf = DayCount::ActActIsda.year_fraction(d(2022, 3, 1), d(2025, 3, 1));
        // 2022 stub + 2023, 2024 whole + 2025 stub
        let expected = 306.0 / 365.0 + 2.0 + 59.0 / 365.0;
        assert_relative_eq!(yf, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_thirty360e_half_year() {
        assert_eq!(
            DayCount::Thirty360E.day_count(d(2025, 1, 15), d(2025, 7, 15)),
            180
        );
    }

    #[test]
    fn test_thirty360e_clamps_31() {
        assert_eq!(
            DayCount::Thirty360E.day_count(d(2025, 1, 31), d(2025, 3, 31)),
            60
        );
    }

    #[test]
    fn test_thirty360us_eom_rule() {
        // d1 = 31 -> 30, then d2 = 31 -> 30
        assert_eq!(
            DayCount::Thirty360US.day_count(d(2025, 1, 31), d(2025, 3, 31)),
            60
        );
        // d1 = 30 triggers the d2 = 31 -> 30 adjustment
        assert_eq!(
            DayCount::Thirty360US.day_count(d(2025, 1, 30), d(2025, 3, 31)),
            60
        );
        // d1 = 29 leaves d2 = 31 unadjusted
        assert_eq!(
            DayCount::Thirty360US.day_count(d(2025, 1, 29), d(2025, 3, 31)),
            62
        );
    }

    #[test]
    fn test_thirty360us_february() {
        // Feb 28 2025 (not a leap year) is last day of February
        assert_eq!(
            DayCount::Thirty360US.day_count(d(2025, 2, 28), d(2025, 8, 28)),
            178
        );
    }

    #[test]
    fn test_thirty360isda_eom() {
        // Both dates at end of month count as 30
        assert_eq!(
            DayCount::Thirty360Isda.day_count(d(2025, 2, 28), d(2025, 8, 31)),
            180
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(DayCount::Act360.name(), "ACT/360");
        assert_eq!(DayCount::Thirty360US.to_string(), "30/360 US");
    }
}
