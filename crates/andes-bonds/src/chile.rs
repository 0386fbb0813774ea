//! Chilean local-market bond extension.
//!
//! Chilean benchmark bonds (BTP/BTU and bank bonds) trade as a percentage
//! of *par value*: the outstanding residual plus interest accrued at the
//! TERA, the annualized issuance rate. This module extends the generic
//! [`Bond`] with those conventions by composition - the local fields ride
//! alongside the bond rather than replacing it.

use serde::{Deserialize, Serialize};

use andes_core::{DayCount, Date, Rate, RateConvention};
use andes_math::solvers::SolverConfig;

use crate::bond::Bond;
use crate::error::{BondError, BondResult};

/// Decimal places of the TERA as published by the exchange.
const TERA_DECIMALS: i32 = 6;
/// Decimal places of a par value.
const PAR_VALUE_DECIMALS: i32 = 8;
/// Decimal places of a quoted price (percentage of par).
const PRICE_DECIMALS: i32 = 4;

/// A Chilean bond: a generic [`Bond`] plus its TERA.
///
/// The TERA (Tasa de Emision de Renta Anual) is the annually compounded
/// ACT/365 rate that prices the full schedule at exactly 100 on the first
/// accrual date. It is fixed at issuance; when not supplied it is solved
/// from the schedule at construction.
///
/// # Example
///
/// ```rust
/// use andes_bonds::{Bond, ClBond, Coupon, CouponSchedule};
/// use andes_core::Date;
///
/// let start = Date::from_ymd(2025, 1, 15).unwrap();
/// let maturity = Date::from_ymd(2026, 1, 15).unwrap();
/// let schedule = CouponSchedule::new(vec![
///     Coupon::new(start, maturity, maturity, 100.0, 100.0, 4.5).unwrap(),
/// ])
/// .unwrap();
///
/// let bond = ClBond::new(Bond::new(schedule, 50_000_000.0).unwrap()).unwrap();
/// // One 4.5% annual coupon: the TERA is 4.5% within rounding
/// assert!((bond.tera().value() - 0.045).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClBond {
    bond: Bond,
    tera: Rate,
}

impl ClBond {
    /// Creates a Chilean bond, solving the TERA from the schedule.
    ///
    /// # Errors
    ///
    /// Propagates the TERA solve: a convergence or bracket error from the
    /// underlying root-finder.
    pub fn new(bond: Bond) -> BondResult<Self> {
        let tera = Self::solve_tera(&bond, &SolverConfig::default())?;
        Ok(Self { bond, tera })
    }

    /// Creates a Chilean bond with a known (published) TERA.
    #[must_use]
    pub fn with_tera(bond: Bond, tera: Rate) -> Self {
        Self { bond, tera }
    }

    /// The TERA rate convention: annually compounded, ACT/365.
    #[must_use]
    pub fn tera_convention() -> RateConvention {
        RateConvention::annual_compounded(DayCount::Act365)
    }

    /// Solves the TERA: the flat annual rate that reconciles the coupon
    /// schedule with a 100 issuance value on the first accrual date.
    fn solve_tera(bond: &Bond, config: &SolverConfig) -> BondResult<Rate> {
        let issue_date = bond.schedule().first_start_date();
        let tera = bond.irr(issue_date, 100.0, Self::tera_convention(), config)?;
        Ok(tera.with_value(round_to(tera.value(), TERA_DECIMALS)))
    }

    /// Returns the underlying generic bond.
    #[must_use]
    pub fn bond(&self) -> &Bond {
        &self.bond
    }

    /// Returns the TERA.
    #[must_use]
    pub fn tera(&self) -> Rate {
        self.tera
    }

    /// Par value at `date`: the current residual plus interest accrued at
    /// the TERA, rounded to 8 decimals.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::NoCurrentCoupon`] when no coupon is accruing
    /// at `date`.
    pub fn par_value(&self, date: Date) -> BondResult<f64> {
        let coupon = self
            .bond
            .schedule()
            .current_coupon(date)
            .ok_or(BondError::NoCurrentCoupon { date })?;
        let accrued = coupon.accrued_interest(date, Some(&self.tera))?;
        Ok(round_to(coupon.residual() + accrued, PAR_VALUE_DECIMALS))
    }

    /// Price at `date` for a traded IRR, as a percentage of par value
    /// rounded to 4 decimals (the exchange quote convention).
    pub fn price(&self, date: Date, irr: &Rate) -> BondResult<f64> {
        let pv = self.bond.present_value(date, irr)?;
        let par = self.par_value(date)?;
        Ok(round_to(100.0 * pv / par, PRICE_DECIMALS))
    }

    /// Settlement cash amount at `date` for a traded IRR.
    ///
    /// `notional x price x par / 10_000`, with the local rounding ladder:
    /// the pre-FX amount is rounded to 8 decimals when an FX conversion
    /// applies, and the final amount is rounded to whole currency units.
    pub fn amount(&self, date: Date, irr: &Rate, fx: f64) -> BondResult<f64> {
        let price = self.price(date, irr)?;
        let par = self.par_value(date)?;
        let mut amount = self.bond.notional() * price * par / 10_000.0;
        if fx != 1.0 {
            amount = round_to(amount, 8);
        }
        Ok((amount * fx).round())
    }
}

/// Rounds to a fixed number of decimal places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10.0_f64.powi(decimals);
    (value * scale).round() / scale
}
