//! Zero-coupon discount curve.

use serde::{Deserialize, Serialize};

use andes_core::{DayCount, Date, Rate, RateConvention};
use andes_math::interpolation::{CubicHermite, Interpolator, LogLinearInterpolator};

use crate::error::{CurveError, CurveResult};

/// A single curve node: a date and its discount factor.
///
/// Nodes always store discount factors internally; zero-rate input is
/// converted once at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveNode {
    date: Date,
    discount_factor: f64,
}

impl CurveNode {
    /// Returns the node date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the node discount factor.
    #[must_use]
    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}

/// Interpolation policy between curve nodes.
///
/// Both policies interpolate in log-discount-factor space and reproduce
/// every node exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Linear in log discount factors: piecewise-constant forward rates.
    LogLinear,
    /// Monotone cubic Hermite (PCHIP) on log discount factors: smooth
    /// forwards without spline overshoot.
    HermiteCubicSpline,
}

/// Extrapolation policy beyond the last node.
///
/// The policy is explicit curve state; interpolation formulas are never
/// evaluated outside the node range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Extrapolation {
    /// Hold the last node's continuously-compounded zero rate flat.
    FlatZeroRate,
    /// Refuse queries beyond the last node.
    Reject,
}

/// Interpolation engine over precomputed node times.
#[derive(Debug, Clone)]
enum Engine {
    /// Log-linear directly on discount factors.
    LogLinear(LogLinearInterpolator),
    /// Monotone cubic on log discount factors.
    Hermite(CubicHermite),
}

impl Engine {
    fn discount_factor_at(&self, t: f64) -> CurveResult<f64> {
        match self {
            Engine::LogLinear(interp) => Ok(interp.interpolate(t)?),
            Engine::Hermite(interp) => Ok(interp.interpolate(t)?.exp()),
        }
    }
}

/// A zero-coupon discount curve.
///
/// A settlement date plus a strictly increasing sequence of dated
/// discount-factor nodes; the node at the settlement date always carries a
/// discount factor of exactly 1. Dates are mapped onto a year-fraction
/// axis with the curve's day count (Act/365 by default) and queried
/// through the configured [`Interpolation`] policy.
///
/// Curves are immutable value objects: [`ZeroCouponCurve::bump`] and
/// [`ZeroCouponCurve::aged`] return new instances.
///
/// # Example
///
/// ```rust
/// use andes_core::Date;
/// use andes_curves::ZeroCouponCurve;
///
/// let settlement = Date::from_ymd(2025, 3, 14).unwrap();
/// let one_year = settlement.add_years(1).unwrap();
///
/// let curve = ZeroCouponCurve::builder()
///     .settlement(settlement)
///     .add_discount_factor(one_year, 0.95)
///     .build()
///     .unwrap();
///
/// // Node dates pass through exactly
/// assert_eq!(curve.discount_factor(one_year).unwrap(), 0.95);
/// ```
#[derive(Debug, Clone)]
pub struct ZeroCouponCurve {
    settlement: Date,
    nodes: Vec<CurveNode>,
    /// Year fractions of the nodes from settlement, on the curve day count.
    times: Vec<f64>,
    interpolation: Interpolation,
    extrapolation: Extrapolation,
    day_count: DayCount,
    engine: Engine,
}

impl ZeroCouponCurve {
    /// Starts building a curve.
    #[must_use]
    pub fn builder() -> ZeroCouponCurveBuilder {
        ZeroCouponCurveBuilder::new()
    }

    /// Returns the settlement date.
    #[must_use]
    pub fn settlement_date(&self) -> Date {
        self.settlement
    }

    /// Returns the curve nodes, settlement node included.
    #[must_use]
    pub fn nodes(&self) -> &[CurveNode] {
        &self.nodes
    }

    /// Returns the last node date.
    #[must_use]
    pub fn max_date(&self) -> Date {
        self.nodes[self.nodes.len() - 1].date()
    }

    /// Returns the interpolation policy.
    #[must_use]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Returns the extrapolation policy.
    #[must_use]
    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Returns the day count mapping dates onto the curve's time axis.
    #[must_use]
    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Returns the discount factor for a date.
    ///
    /// A date equal to a node returns that node's stored value without
    /// touching the interpolant, so node round trips are exact. Dates
    /// between nodes interpolate per the curve's [`Interpolation`] policy;
    /// dates beyond the last node follow the [`Extrapolation`] policy.
    ///
    /// # Errors
    ///
    /// [`CurveError::DateBeforeSettlement`] for dates before settlement;
    /// [`CurveError::DateOutOfRange`] beyond the last node under
    /// [`Extrapolation::Reject`].
    pub fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        if date < self.settlement {
            return Err(CurveError::DateBeforeSettlement {
                date,
                settlement: self.settlement,
            });
        }

        // Exact node passthrough
        if let Ok(i) = self.nodes.binary_search_by(|n| n.date().cmp(&date)) {
            return Ok(self.nodes[i].discount_factor());
        }

        let t = self.day_count.year_fraction(self.settlement, date);
        let t_max = self.times[self.times.len() - 1];

        if t <= t_max {
            return self.engine.discount_factor_at(t);
        }

        match self.extrapolation {
            Extrapolation::FlatZeroRate => {
                let last = &self.nodes[self.nodes.len() - 1];
                let z = -last.discount_factor().ln() / t_max;
                Ok((-z * t).exp())
            }
            Extrapolation::Reject => Err(CurveError::DateOutOfRange {
                date,
                max: self.max_date(),
            }),
        }
    }

    /// Returns the factor by which money at `date1` grows to `date2`:
    /// `df(date1) / df(date2)`.
    ///
    /// Well defined for either date order; with `date2 < date1` the result
    /// is below 1 (a discount rather than a growth).
    pub fn wealth_factor(&self, date1: Date, date2: Date) -> CurveResult<f64> {
        Ok(self.discount_factor(date1)? / self.discount_factor(date2)?)
    }

    /// Returns the forward rate between two dates under the requested
    /// convention.
    ///
    /// The wealth factor comes from the curve; the year fraction between
    /// the dates comes from the convention's own day count.
    pub fn forward_rate(
        &self,
        date1: Date,
        date2: Date,
        convention: RateConvention,
    ) -> CurveResult<Rate> {
        let wf = self.wealth_factor(date1, date2)?;
        let yf = convention.year_fraction(date1, date2);
        Ok(Rate::from_wealth_factor(wf, yf, convention)?)
    }

    /// Returns the zero rate from settlement to `date` under the requested
    /// convention.
    pub fn zero_rate(&self, date: Date, convention: RateConvention) -> CurveResult<Rate> {
        self.forward_rate(self.settlement, date, convention)
    }

    /// Returns a new curve with every zero rate shifted in parallel.
    ///
    /// Each node's discount factor is converted to a continuously
    /// compounded zero rate, shifted by `shift_bps` basis points, and
    /// converted back; interpolation and extrapolation policies carry
    /// over. This is the bump behind DV01.
    pub fn bump(&self, shift_bps: f64) -> CurveResult<ZeroCouponCurve> {
        let shift = shift_bps / 10_000.0;
        let mut builder = ZeroCouponCurveBuilder::new()
            .settlement(self.settlement)
            .day_count(self.day_count)
            .interpolation(self.interpolation)
            .extrapolation(self.extrapolation);

        for (node, &t) in self.nodes.iter().zip(&self.times).skip(1) {
            let z = -node.discount_factor().ln() / t;
            let bumped = (-(z + shift) * t).exp();
            builder = builder.add_discount_factor(node.date(), bumped);
        }
        builder.build()
    }

    /// Returns this curve re-based to a later settlement date.
    ///
    /// Every surviving discount factor is divided by the discount factor at
    /// `new_settlement`; nodes at or before the new settlement are dropped
    /// (the new settlement node, with factor 1, is reinstated by
    /// construction). The aged curve satisfies
    /// `aged(d).discount_factor(d) == 1.0`.
    ///
    /// # Errors
    ///
    /// The new settlement must lie in `[settlement, last node)`.
    pub fn aged(&self, new_settlement: Date) -> CurveResult<ZeroCouponCurve> {
        if new_settlement >= self.max_date() {
            return Err(CurveError::DateOutOfRange {
                date: new_settlement,
                max: self.max_date(),
            });
        }
        let base = self.discount_factor(new_settlement)?;

        let mut builder = ZeroCouponCurveBuilder::new()
            .settlement(new_settlement)
            .day_count(self.day_count)
            .interpolation(self.interpolation)
            .extrapolation(self.extrapolation);

        for node in self.nodes.iter().filter(|n| n.date() > new_settlement) {
            builder = builder.add_discount_factor(node.date(), node.discount_factor() / base);
        }
        builder.build()
    }
}

/// Which kind of values a builder has been fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    DiscountFactor,
    ZeroRate,
}

/// Builder for [`ZeroCouponCurve`].
///
/// A curve is built from either discount factors or zero rates - one kind
/// per curve; mixing the two is rejected. Zero rates are interpreted
/// through their own [`RateConvention`] over the period from settlement to
/// the node date.
#[derive(Debug, Clone)]
pub struct ZeroCouponCurveBuilder {
    settlement: Option<Date>,
    day_count: DayCount,
    interpolation: Interpolation,
    extrapolation: Extrapolation,
    dfs: Vec<(Date, f64)>,
    rates: Vec<(Date, Rate)>,
}

impl Default for ZeroCouponCurveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZeroCouponCurveBuilder {
    /// Creates a builder with the default policies: Act/365 time axis,
    /// log-linear interpolation, flat zero-rate extrapolation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settlement: None,
            day_count: DayCount::Act365,
            interpolation: Interpolation::LogLinear,
            extrapolation: Extrapolation::FlatZeroRate,
            dfs: Vec::new(),
            rates: Vec::new(),
        }
    }

    /// Sets the settlement date (required).
    #[must_use]
    pub fn settlement(mut self, date: Date) -> Self {
        self.settlement = Some(date);
        self
    }

    /// Sets the day count for the curve's time axis.
    #[must_use]
    pub fn day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the interpolation policy.
    #[must_use]
    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the extrapolation policy.
    #[must_use]
    pub fn extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Adds a discount-factor node.
    #[must_use]
    pub fn add_discount_factor(mut self, date: Date, discount_factor: f64) -> Self {
        self.dfs.push((date, discount_factor));
        self
    }

    /// Adds a zero-rate node.
    #[must_use]
    pub fn add_zero_rate(mut self, date: Date, rate: Rate) -> Self {
        self.rates.push((date, rate));
        self
    }

    /// Builds the curve.
    ///
    /// # Errors
    ///
    /// - [`CurveError::Config`] if the settlement date is missing or no
    ///   nodes were added
    /// - [`CurveError::MixedNodeKinds`] if both kinds of node were added
    /// - [`CurveError::NonMonotonicDates`] for duplicate or unsorted dates
    /// - [`CurveError::InvalidValue`] for non-positive or non-finite
    ///   discount factors, or a settlement-date node with factor != 1
    pub fn build(self) -> CurveResult<ZeroCouponCurve> {
        let settlement = self
            .settlement
            .ok_or_else(|| CurveError::config("settlement date is required"))?;

        let kind = match (self.dfs.is_empty(), self.rates.is_empty()) {
            (false, false) => return Err(CurveError::MixedNodeKinds),
            (true, true) => return Err(CurveError::config("at least one node is required")),
            (false, true) => NodeKind::DiscountFactor,
            (true, false) => NodeKind::ZeroRate,
        };

        let mut pairs: Vec<(Date, f64)> = match kind {
            NodeKind::DiscountFactor => self.dfs,
            NodeKind::ZeroRate => {
                let mut out = Vec::with_capacity(self.rates.len());
                for (date, rate) in self.rates {
                    let yf = rate.convention().year_fraction(settlement, date);
                    out.push((date, rate.discount_factor(yf)?));
                }
                out
            }
        };
        pairs.sort_by_key(|(date, _)| *date);

        // The settlement node is implicit; an explicit one must carry df = 1
        let mut nodes = vec![CurveNode {
            date: settlement,
            discount_factor: 1.0,
        }];
        for (date, df) in pairs {
            if date < settlement {
                return Err(CurveError::DateBeforeSettlement { date, settlement });
            }
            if date == settlement {
                if df != 1.0 {
                    return Err(CurveError::invalid_value(format!(
                        "node at settlement must have discount factor 1, got {df}"
                    )));
                }
                continue;
            }
            if !df.is_finite() || df <= 0.0 {
                return Err(CurveError::invalid_value(format!(
                    "discount factor {df} at {date} is not a positive finite number"
                )));
            }
            let prev = nodes[nodes.len() - 1].date();
            if date <= prev {
                return Err(CurveError::NonMonotonicDates {
                    prev,
                    current: date,
                });
            }
            nodes.push(CurveNode {
                date,
                discount_factor: df,
            });
        }

        if nodes.len() < 2 {
            return Err(CurveError::config(
                "at least one node after settlement is required",
            ));
        }

        let times: Vec<f64> = nodes
            .iter()
            .map(|n| self.day_count.year_fraction(settlement, n.date()))
            .collect();
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CurveError::config(format!(
                "day count {} collapses distinct node dates onto the same time",
                self.day_count
            )));
        }

        let engine = match self.interpolation {
            Interpolation::LogLinear => {
                let dfs: Vec<f64> = nodes.iter().map(CurveNode::discount_factor).collect();
                Engine::LogLinear(LogLinearInterpolator::new(times.clone(), dfs)?)
            }
            Interpolation::HermiteCubicSpline => {
                let log_dfs: Vec<f64> = nodes
                    .iter()
                    .map(|n| n.discount_factor().ln())
                    .collect();
                Engine::Hermite(CubicHermite::new(times.clone(), log_dfs)?)
            }
        };

        Ok(ZeroCouponCurve {
            settlement,
            nodes,
            times,
            interpolation: self.interpolation,
            extrapolation: self.extrapolation,
            day_count: self.day_count,
            engine,
        })
    }
}
