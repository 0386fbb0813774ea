//! Coupon periods and schedules.
//!
//! A [`Coupon`] is one accrual period of a fixed-rate bond: the residual
//! (outstanding notional) over the period, the interest it earns, and the
//! amortization paid at the end. A [`CouponSchedule`] is the ordered
//! sequence of periods; schedule *generation* (tenors, business-day
//! rolls) happens outside this crate - the schedule here is a validated,
//! read-only description.

use serde::{Deserialize, Serialize};

use andes_core::{CashFlow, DayCount, Date, Rate, RateConvention};

use crate::error::{BondError, BondResult};

/// One accrual period of a fixed-rate bond.
///
/// Amounts are in the schedule's own units (per 100 of face for Chilean
/// bonds). The coupon rate is not stored by the issuer but implied: the
/// rate whose wealth factor over the accrual period turns `residual` into
/// `residual + interest`, under the coupon's rate convention (Linear
/// ACT/360 unless overridden).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    start_date: Date,
    end_date: Date,
    payment_date: Date,
    amortization: f64,
    residual: f64,
    interest: f64,
    coupon_rate: Rate,
}

impl Coupon {
    /// Creates a coupon with the default Linear ACT/360 rate convention.
    pub fn new(
        start_date: Date,
        end_date: Date,
        payment_date: Date,
        amortization: f64,
        residual: f64,
        interest: f64,
    ) -> BondResult<Self> {
        Self::with_rate_convention(
            start_date,
            end_date,
            payment_date,
            amortization,
            residual,
            interest,
            RateConvention::linear(DayCount::Act360),
        )
    }

    /// Creates a coupon, implying its rate under the given convention.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::InvalidCoupon`] unless
    /// `start_date < end_date <= payment_date`, `residual` is positive and
    /// at least `amortization`, and the amounts are finite and
    /// non-negative.
    #[allow(clippy::too_many_arguments)]
    pub fn with_rate_convention(
        start_date: Date,
        end_date: Date,
        payment_date: Date,
        amortization: f64,
        residual: f64,
        interest: f64,
        rate_convention: RateConvention,
    ) -> BondResult<Self> {
        if start_date >= end_date {
            return Err(BondError::invalid_coupon(format!(
                "start date {start_date} must precede end date {end_date}"
            )));
        }
        if payment_date < end_date {
            return Err(BondError::invalid_coupon(format!(
                "payment date {payment_date} must not precede end date {end_date}"
            )));
        }
        for (name, value) in [
            ("amortization", amortization),
            ("residual", residual),
            ("interest", interest),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BondError::invalid_coupon(format!(
                    "{name} {value} must be a non-negative finite number"
                )));
            }
        }
        if residual <= 0.0 {
            return Err(BondError::invalid_coupon(format!(
                "residual {residual} must be positive"
            )));
        }
        if residual < amortization {
            return Err(BondError::invalid_coupon(format!(
                "residual {residual} must be at least the amortization {amortization}"
            )));
        }

        let wf = (interest + residual) / residual;
        let yf = rate_convention.year_fraction(start_date, end_date);
        let coupon_rate = Rate::from_wealth_factor(wf, yf, rate_convention)?;

        Ok(Self {
            start_date,
            end_date,
            payment_date,
            amortization,
            residual,
            interest,
            coupon_rate,
        })
    }

    /// Returns the accrual start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Returns the accrual end date.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Returns the payment date.
    #[must_use]
    pub fn payment_date(&self) -> Date {
        self.payment_date
    }

    /// Returns the amortization paid with this coupon.
    #[must_use]
    pub fn amortization(&self) -> f64 {
        self.amortization
    }

    /// Returns the residual (outstanding notional) during this period.
    #[must_use]
    pub fn residual(&self) -> f64 {
        self.residual
    }

    /// Returns the interest paid with this coupon.
    #[must_use]
    pub fn interest(&self) -> f64 {
        self.interest
    }

    /// Returns the implied coupon rate.
    #[must_use]
    pub fn coupon_rate(&self) -> Rate {
        self.coupon_rate
    }

    /// Returns the total cash paid at the payment date.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amortization + self.interest
    }

    /// Interest accrued on the residual from the period start to `date`.
    ///
    /// Accrues at the implied coupon rate, or at `accrue_rate` when given
    /// (the TERA for Chilean par values). Zero for dates at or before the
    /// period start.
    pub fn accrued_interest(&self, date: Date, accrue_rate: Option<&Rate>) -> BondResult<f64> {
        if date <= self.start_date {
            return Ok(0.0);
        }
        let rate = accrue_rate.unwrap_or(&self.coupon_rate);
        let yf = rate.convention().year_fraction(self.start_date, date);
        Ok(rate.accrued_interest(self.residual, yf)?)
    }
}

/// A validated, ordered sequence of coupons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponSchedule {
    coupons: Vec<Coupon>,
}

impl CouponSchedule {
    /// Creates a schedule from coupons, sorting them by start date.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::InvalidSchedule`] if the schedule is empty or
    /// the sorted payment dates are not strictly increasing.
    pub fn new(mut coupons: Vec<Coupon>) -> BondResult<Self> {
        if coupons.is_empty() {
            return Err(BondError::invalid_schedule("schedule is empty"));
        }
        coupons.sort_by_key(Coupon::start_date);

        for pair in coupons.windows(2) {
            if pair[1].payment_date() <= pair[0].payment_date() {
                return Err(BondError::invalid_schedule(format!(
                    "payment dates must be strictly increasing: {} then {}",
                    pair[0].payment_date(),
                    pair[1].payment_date()
                )));
            }
        }

        Ok(Self { coupons })
    }

    /// Returns the coupons in accrual order.
    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Returns the first accrual start date.
    #[must_use]
    pub fn first_start_date(&self) -> Date {
        self.coupons[0].start_date()
    }

    /// Returns the final payment date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.coupons[self.coupons.len() - 1].payment_date()
    }

    /// Returns every cash flow (amortization + interest per payment date).
    #[must_use]
    pub fn flows(&self) -> Vec<CashFlow> {
        self.coupons
            .iter()
            .map(|c| CashFlow::new(c.payment_date(), c.amount()))
            .collect()
    }

    /// Returns the cash flows paying strictly after `date`.
    #[must_use]
    pub fn remaining_flows(&self, date: Date) -> Vec<CashFlow> {
        self.coupons
            .iter()
            .filter(|c| c.payment_date() > date)
            .map(|c| CashFlow::new(c.payment_date(), c.amount()))
            .collect()
    }

    /// Returns the coupon accruing at `date`, if any.
    ///
    /// A coupon accrues from its start date (inclusive) to its payment
    /// date (exclusive).
    #[must_use]
    pub fn current_coupon(&self, date: Date) -> Option<&Coupon> {
        self.coupons
            .iter()
            .find(|c| c.start_date() <= date && c.payment_date() > date)
    }

    /// Returns the residual outstanding at `date`, if a coupon is accruing.
    #[must_use]
    pub fn residual_at(&self, date: Date) -> Option<f64> {
        self.current_coupon(date).map(Coupon::residual)
    }

    /// Interest accrued at `date` on the current coupon; zero when no
    /// coupon is accruing.
    pub fn accrued_interest(&self, date: Date, accrue_rate: Option<&Rate>) -> BondResult<f64> {
        match self.current_coupon(date) {
            Some(coupon) => coupon.accrued_interest(date, accrue_rate),
            None => Ok(0.0),
        }
    }

    /// Returns the implied rate of the first coupon.
    #[must_use]
    pub fn coupon_rate(&self) -> Rate {
        self.coupons[0].coupon_rate()
    }
}
