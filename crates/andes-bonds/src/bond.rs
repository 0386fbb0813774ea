//! Bond valuation: present value, IRR, duration, DV01.

use serde::{Deserialize, Serialize};

use andes_core::{CashFlow, Date, Rate, RateConvention};
use andes_curves::ZeroCouponCurve;
use andes_math::solvers::{newton_bisection, SolverConfig};

use crate::coupons::CouponSchedule;
use crate::error::{BondError, BondResult};

/// Default search bracket for IRR solving, in decimal rate terms.
///
/// Callers with unusual instruments (deeply negative or triple-digit
/// yields) supply their own bracket through [`Bond::irr_with_bracket`].
pub const DEFAULT_IRR_BRACKET: (f64, f64) = (-0.99, 10.0);

/// A fixed-rate bond: a coupon schedule plus a face amount.
///
/// The bond is a read-only description. It owns no curve; discount curves
/// are passed per valuation call, so one bond can be priced against many
/// curves and one curve can price many bonds. Schedule amounts are per
/// 100 of face, the local market convention.
///
/// # Example
///
/// ```rust
/// use andes_bonds::{Bond, Coupon, CouponSchedule};
/// use andes_core::{DayCount, Date, Rate, RateConvention};
///
/// let start = Date::from_ymd(2025, 1, 15).unwrap();
/// let maturity = Date::from_ymd(2026, 1, 15).unwrap();
/// let schedule = CouponSchedule::new(vec![
///     Coupon::new(start, maturity, maturity, 100.0, 100.0, 0.0).unwrap(),
/// ])
/// .unwrap();
/// let bond = Bond::new(schedule, 50_000_000.0).unwrap();
///
/// let yield_5 = Rate::new(0.05, RateConvention::linear(DayCount::Act365));
/// let pv = bond.present_value(start, &yield_5).unwrap();
/// assert!((pv - 100.0 / 1.05).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    schedule: CouponSchedule,
    notional: f64,
}

impl Bond {
    /// Creates a bond.
    ///
    /// # Errors
    ///
    /// Returns [`BondError::InvalidSchedule`] if the notional is not a
    /// positive finite number.
    pub fn new(schedule: CouponSchedule, notional: f64) -> BondResult<Self> {
        if !notional.is_finite() || notional <= 0.0 {
            return Err(BondError::invalid_schedule(format!(
                "notional {notional} must be a positive finite number"
            )));
        }
        Ok(Self { schedule, notional })
    }

    /// Returns the coupon schedule.
    #[must_use]
    pub fn schedule(&self) -> &CouponSchedule {
        &self.schedule
    }

    /// Returns the face amount.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the final payment date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.schedule.maturity_date()
    }

    /// Cash flows paying strictly after `date`, or an error if none do.
    fn future_flows(&self, date: Date) -> BondResult<Vec<CashFlow>> {
        let flows = self.schedule.remaining_flows(date);
        if flows.is_empty() {
            return Err(BondError::NoFutureCashFlows { date });
        }
        Ok(flows)
    }

    /// Present value per 100 face at `date`, discounting every future cash
    /// flow with the flat `rate`.
    ///
    /// Year fractions come from the rate's own day count. Only flows
    /// strictly after `date` contribute.
    pub fn present_value(&self, date: Date, rate: &Rate) -> BondResult<f64> {
        let mut pv = 0.0;
        for flow in self.future_flows(date)? {
            let yf = rate.convention().year_fraction(date, flow.date());
            pv += flow.amount() * rate.discount_factor(yf)?;
        }
        Ok(pv)
    }

    /// Present value per 100 face against a discount curve, valued at the
    /// curve's settlement date.
    pub fn present_value_on_curve(&self, curve: &ZeroCouponCurve) -> BondResult<f64> {
        let date = curve.settlement_date();
        let mut pv = 0.0;
        for flow in self.future_flows(date)? {
            pv += flow.amount() * curve.discount_factor(flow.date())?;
        }
        Ok(pv)
    }

    /// Solves the flat rate whose present value equals `target_pv`, over
    /// the default bracket [`DEFAULT_IRR_BRACKET`].
    pub fn irr(
        &self,
        date: Date,
        target_pv: f64,
        convention: RateConvention,
        config: &SolverConfig,
    ) -> BondResult<Rate> {
        self.irr_with_bracket(date, target_pv, convention, DEFAULT_IRR_BRACKET, config)
    }

    /// Solves the flat rate whose present value equals `target_pv` inside
    /// `bracket`.
    ///
    /// A Newton iteration seeded at the bond's coupon rate runs first (the
    /// PV is smooth and monotone decreasing in rate for positive-coupon
    /// bonds); bisection over the bracket finishes the job when Newton
    /// strays. Rates at which the PV is undefined (a wealth factor driven
    /// non-positive) price as infinitely expensive, which keeps the
    /// objective monotone for bracketing.
    ///
    /// # Errors
    ///
    /// [`BondError::Math`] with an `InvalidBracket` kind when the bracket
    /// contains no solution, or a `ConvergenceFailed` kind - carrying the
    /// last iterate and residual - when the iteration budget runs out.
    pub fn irr_with_bracket(
        &self,
        date: Date,
        target_pv: f64,
        convention: RateConvention,
        bracket: (f64, f64),
        config: &SolverConfig,
    ) -> BondResult<Rate> {
        // Fail fast on an empty remaining schedule
        self.future_flows(date)?;

        let objective = |value: f64| {
            let rate = Rate::new(value, convention);
            match self.present_value(date, &rate) {
                Ok(pv) => pv - target_pv,
                Err(_) => f64::INFINITY,
            }
        };

        let seed = self.schedule.coupon_rate().value();
        let result = newton_bisection(objective, seed, bracket, config)?;
        Ok(Rate::new(result.root, convention))
    }

    /// Macaulay duration in years at `date` under the flat `rate`:
    /// the PV-weighted average time to each cash flow.
    ///
    /// Times are measured with the rate convention's day count.
    pub fn duration(&self, date: Date, rate: &Rate) -> BondResult<f64> {
        let mut pv = 0.0;
        let mut weighted = 0.0;
        for flow in self.future_flows(date)? {
            let yf = rate.convention().year_fraction(date, flow.date());
            let flow_pv = flow.amount() * rate.discount_factor(yf)?;
            pv += flow_pv;
            weighted += flow_pv * yf;
        }
        Ok(weighted / pv)
    }

    /// Macaulay duration in years against a discount curve, valued at the
    /// curve's settlement date with times on the curve's own day count.
    pub fn duration_on_curve(&self, curve: &ZeroCouponCurve) -> BondResult<f64> {
        let date = curve.settlement_date();
        let mut pv = 0.0;
        let mut weighted = 0.0;
        for flow in self.future_flows(date)? {
            let flow_pv = flow.amount() * curve.discount_factor(flow.date())?;
            pv += flow_pv;
            weighted += flow_pv * curve.day_count().year_fraction(date, flow.date());
        }
        Ok(weighted / pv)
    }

    /// DV01 against a curve: the value change of the position for a one
    /// basis point parallel shift, in currency units of the notional.
    ///
    /// Computed as `pv(curve) - pv(curve bumped +1bp)`, scaled by
    /// `notional / 100`. Positive for a long position in a bond with
    /// positive cash flows: rates up one basis point, value down by the
    /// DV01.
    pub fn dv01(&self, curve: &ZeroCouponCurve) -> BondResult<f64> {
        let base = self.present_value_on_curve(curve)?;
        let bumped = self.present_value_on_curve(&curve.bump(1.0)?)?;
        Ok((base - bumped) * self.notional / 100.0)
    }

    /// Interest accrued at `date` on the coupon currently running, at its
    /// implied rate or at `accrue_rate` when given.
    pub fn accrued_interest(&self, date: Date, accrue_rate: Option<&Rate>) -> BondResult<f64> {
        self.schedule.accrued_interest(date, accrue_rate)
    }
}
