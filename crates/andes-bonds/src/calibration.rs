//! Nelson-Siegel-Svensson calibration against market bonds.
//!
//! Fits the six NSS parameters to a basket of bonds and their observed
//! market yields by minimizing the sum of squared present-value errors,
//! then materializes the fitted function as a discount curve.

use log::debug;

use andes_core::{DayCount, Date, Rate};
use andes_curves::{NssParameters, ZeroCouponCurve};
use andes_math::optimization::{levenberg_marquardt, LeastSquaresConfig};

use crate::bond::Bond;
use crate::error::{BondError, BondResult};

/// Free parameters of the NSS model.
const FREE_PARAMETERS: usize = 6;

/// Configuration for the NSS calibrator.
///
/// The decay-speed windows keep the optimizer away from degenerate basis
/// functions: the first hump is constrained to the 0.5-7 year range
/// (`lambda` in [1/7, 2]) and the second to the 3-20 year range (`mu` in
/// [1/20, 1/3]). Every trial step is clamped into these boxes, so the
/// basis is never evaluated at a non-positive decay speed.
#[derive(Debug, Clone, Copy)]
pub struct NssCalibratorConfig {
    /// Levenberg-Marquardt settings (objective tolerance, iteration
    /// budget, damping ladder).
    pub least_squares: LeastSquaresConfig,
    /// Box for each beta coefficient, in decimal rate terms.
    pub beta_bounds: (f64, f64),
    /// Box for the first decay speed.
    pub lambda_bounds: (f64, f64),
    /// Box for the second decay speed.
    pub mu_bounds: (f64, f64),
}

impl Default for NssCalibratorConfig {
    fn default() -> Self {
        Self {
            least_squares: LeastSquaresConfig::default().with_max_iterations(300),
            beta_bounds: (-1.0, 1.0),
            lambda_bounds: (1.0 / 7.0, 2.0),
            mu_bounds: (1.0 / 20.0, 1.0 / 3.0),
        }
    }
}

/// Calibrates [`NssParameters`] to bond/yield observations.
///
/// The calibration is deterministic: the seed is a fixed heuristic of the
/// observation set (no randomized restarts), so the same observations
/// always produce the same parameters.
///
/// # Example
///
/// ```rust,ignore
/// let calibrator = NssCalibrator::new();
/// let params = calibrator.calibrate(settlement, &observations)?;
/// let curve = params.to_curve(settlement, &horizon)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct NssCalibrator {
    config: NssCalibratorConfig,
}

impl NssCalibrator {
    /// Creates a calibrator with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a calibrator with a custom configuration.
    #[must_use]
    pub fn with_config(config: NssCalibratorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &NssCalibratorConfig {
        &self.config
    }

    /// Fits the NSS parameters to `(bond, observed IRR)` pairs.
    ///
    /// Each bond's market present value is computed from its observed IRR;
    /// the optimizer then matches the model present values - future cash
    /// flows discounted at `exp(-z(t) * t)` on the Act/365 axis - against
    /// those targets in the least-squares sense.
    ///
    /// # Errors
    ///
    /// - [`BondError::Underdetermined`] with fewer than six usable
    ///   observations (bonds maturing after `settlement`)
    /// - [`BondError::CalibrationFailed`] when the optimizer exhausts its
    ///   budget above tolerance; the error carries the iteration count,
    ///   final objective and last parameter iterate
    pub fn calibrate(
        &self,
        settlement: Date,
        observations: &[(Bond, Rate)],
    ) -> BondResult<NssParameters> {
        let mut usable: Vec<&(Bond, Rate)> = observations
            .iter()
            .filter(|(bond, _)| bond.maturity_date() > settlement)
            .collect();
        if usable.len() < FREE_PARAMETERS {
            return Err(BondError::Underdetermined {
                observations: usable.len(),
                parameters: FREE_PARAMETERS,
            });
        }
        usable.sort_by_key(|(bond, _)| bond.maturity_date());

        let mut market_pvs = Vec::with_capacity(usable.len());
        let mut flow_grids = Vec::with_capacity(usable.len());
        for (bond, irr) in &usable {
            market_pvs.push(bond.present_value(settlement, irr)?);
            let grid: Vec<(f64, f64)> = bond
                .schedule()
                .remaining_flows(settlement)
                .iter()
                .map(|flow| {
                    (
                        DayCount::Act365.year_fraction(settlement, flow.date()),
                        flow.amount(),
                    )
                })
                .collect();
            flow_grids.push(grid);
        }

        let residuals = |params: &[f64]| -> Vec<f64> {
            let model = match NssParameters::from_array([
                params[0], params[1], params[2], params[3], params[4], params[5],
            ]) {
                Ok(model) => model,
                // Out-of-domain decay speeds price nothing: a flat penalty
                // pushes the step back inside the box
                Err(_) => return vec![1e9; flow_grids.len()],
            };
            flow_grids
                .iter()
                .zip(&market_pvs)
                .map(|(grid, market_pv)| {
                    let pv: f64 = grid
                        .iter()
                        .map(|&(t, amount)| amount * model.discount_factor(t))
                        .sum();
                    pv - market_pv
                })
                .collect()
        };

        let seed = self.seed(&usable);
        let bounds = self.bounds();
        let result =
            levenberg_marquardt(residuals, &seed, Some(&bounds), &self.config.least_squares)?;

        debug!(
            "nss calibration over {} bonds: {} iterations, objective {:.4e}",
            usable.len(),
            result.iterations,
            result.objective
        );

        if !result.converged {
            return Err(BondError::CalibrationFailed {
                iterations: result.iterations,
                objective: result.objective,
                last: result.parameters,
            });
        }

        let p = result.parameters;
        Ok(NssParameters::from_array([
            p[0], p[1], p[2], p[3], p[4], p[5],
        ])?)
    }

    /// Calibrates and materializes the fitted function as a curve.
    ///
    /// With no explicit horizon the curve carries monthly nodes out to 20
    /// years from settlement.
    pub fn calibrate_curve(
        &self,
        settlement: Date,
        observations: &[(Bond, Rate)],
        horizon: Option<&[Date]>,
    ) -> BondResult<ZeroCouponCurve> {
        let params = self.calibrate(settlement, observations)?;
        let curve = match horizon {
            Some(dates) => params.to_curve(settlement, dates)?,
            None => {
                let mut dates = Vec::with_capacity(240);
                for months in 1..=240 {
                    dates.push(settlement.add_months(months)?);
                }
                params.to_curve(settlement, &dates)?
            }
        };
        Ok(curve)
    }

    /// Deterministic heuristic seed from the observation set.
    ///
    /// Level from the average observed yield, slope from the short end
    /// (three shortest maturities) against that level, flat humps, decay
    /// speeds in the middle of their windows.
    fn seed(&self, usable: &[&(Bond, Rate)]) -> [f64; 6] {
        let n = usable.len();
        let mean_irr: f64 = usable.iter().map(|(_, irr)| irr.value()).sum::<f64>() / n as f64;
        let shorts = &usable[..n.min(3)];
        let short_mean: f64 =
            shorts.iter().map(|(_, irr)| irr.value()).sum::<f64>() / shorts.len() as f64;

        let bounds = self.bounds();
        let raw = [mean_irr, short_mean - mean_irr, 0.0, 0.01, 0.5, 0.2];
        let mut seed = [0.0; 6];
        for (i, (value, (lo, hi))) in raw.iter().zip(bounds).enumerate() {
            seed[i] = value.clamp(lo, hi);
        }
        seed
    }

    fn bounds(&self) -> [(f64, f64); 6] {
        [
            self.config.beta_bounds,
            self.config.beta_bounds,
            self.config.beta_bounds,
            self.config.beta_bounds,
            self.config.lambda_bounds,
            self.config.mu_bounds,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupons::{Coupon, CouponSchedule};
    use andes_core::RateConvention;
    use andes_math::solvers::SolverConfig;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    /// A discount (single-flow) bond paying 100 at maturity.
    fn discount_bond(start: Date, maturity: Date) -> Bond {
        let schedule = CouponSchedule::new(vec![Coupon::new(
            start, maturity, maturity, 100.0, 100.0, 0.0,
        )
        .unwrap()])
        .unwrap();
        Bond::new(schedule, 100.0).unwrap()
    }

    /// Observations priced exactly from a known parameter set.
    fn synthetic_observations(
        settlement: Date,
        truth: &NssParameters,
        years: &[i32],
    ) -> Vec<(Bond, Rate)> {
        let convention = RateConvention::annual_compounded(DayCount::Act365);
        years
            .iter()
            .map(|&y| {
                let maturity = settlement.add_years(y).unwrap();
                let bond = discount_bond(settlement, maturity);
                let t = DayCount::Act365.year_fraction(settlement, maturity);
                let market_pv = 100.0 * truth.discount_factor(t);
                let irr = bond
                    .irr(settlement, market_pv, convention, &SolverConfig::default())
                    .unwrap();
                (bond, irr)
            })
            .collect()
    }

    #[test]
    fn test_three_observations_is_underdetermined() {
        let settlement = d(2025, 3, 14);
        let truth = NssParameters::new(0.05, -0.02, 0.01, 0.005, 0.5, 0.2).unwrap();
        let observations = synthetic_observations(settlement, &truth, &[1, 2, 3]);

        let err = NssCalibrator::new()
            .calibrate(settlement, &observations)
            .unwrap_err();
        assert!(matches!(
            err,
            BondError::Underdetermined {
                observations: 3,
                parameters: 6
            }
        ));
    }

    #[test]
    fn test_matured_bonds_do_not_count_as_observations() {
        let settlement = d(2025, 3, 14);
        let truth = NssParameters::new(0.05, -0.02, 0.01, 0.005, 0.5, 0.2).unwrap();
        // Six bonds, but three matured before settlement
        let mut observations =
            synthetic_observations(settlement, &truth, &[1, 2, 3]);
        let past = d(2020, 3, 16);
        for y in 1..=3 {
            let bond = discount_bond(past, past.add_years(y).unwrap());
            let irr = Rate::new(0.04, RateConvention::annual_compounded(DayCount::Act365));
            observations.push((bond, irr));
        }

        let err = NssCalibrator::new()
            .calibrate(settlement, &observations)
            .unwrap_err();
        assert!(matches!(err, BondError::Underdetermined { .. }));
    }

    #[test]
    fn test_recovers_synthetic_curve() {
        let settlement = d(2025, 3, 14);
        let truth = NssParameters::new(0.05, -0.02, 0.01, 0.005, 0.5, 0.2).unwrap();
        let observations =
            synthetic_observations(settlement, &truth, &[1, 2, 3, 4, 5, 7, 10, 15]);

        let config = NssCalibratorConfig {
            least_squares: LeastSquaresConfig::default()
                .with_tolerance(1e-5)
                .with_max_iterations(500),
            ..Default::default()
        };

        let params = NssCalibrator::with_config(config)
            .calibrate(settlement, &observations)
            .unwrap();

        // The fitted function must reprice every observation tightly
        for (bond, irr) in &observations {
            let market_pv = bond.present_value(settlement, irr).unwrap();
            let t = DayCount::Act365.year_fraction(settlement, bond.maturity_date());
            let model_pv = 100.0 * params.discount_factor(t);
            assert!(
                (model_pv - market_pv).abs() < 0.05,
                "repricing error {:.4} at {}y",
                model_pv - market_pv,
                t
            );
        }
    }

    #[test]
    fn test_calibration_is_deterministic() {
        let settlement = d(2025, 3, 14);
        let truth = NssParameters::new(0.048, -0.015, 0.0, 0.01, 0.4, 0.15).unwrap();
        let observations =
            synthetic_observations(settlement, &truth, &[1, 2, 3, 5, 7, 10]);

        let config = NssCalibratorConfig {
            least_squares: LeastSquaresConfig::default()
                .with_tolerance(1e-5)
                .with_max_iterations(500),
            ..Default::default()
        };
        let calibrator = NssCalibrator::with_config(config);

        let first = calibrator.calibrate(settlement, &observations).unwrap();
        let second = calibrator.calibrate(settlement, &observations).unwrap();
        assert_eq!(first.to_array(), second.to_array());
    }

    #[test]
    fn test_budget_exhaustion_reports_last_iterate() {
        let settlement = d(2025, 3, 14);
        let truth = NssParameters::new(0.05, -0.02, 0.01, 0.005, 0.5, 0.2).unwrap();
        let observations =
            synthetic_observations(settlement, &truth, &[1, 2, 3, 4, 5, 7, 10, 15]);

        // One iteration cannot reach tolerance from the heuristic seed
        let config = NssCalibratorConfig {
            least_squares: LeastSquaresConfig::default().with_max_iterations(1),
            ..Default::default()
        };

        let err = NssCalibrator::with_config(config)
            .calibrate(settlement, &observations)
            .unwrap_err();
        match err {
            BondError::CalibrationFailed {
                iterations, last, ..
            } => {
                assert_eq!(iterations, 1);
                assert_eq!(last.len(), 6);
            }
            other => panic!("expected CalibrationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_calibrate_curve_default_horizon() {
        let settlement = d(2025, 3, 14);
        let truth = NssParameters::new(0.05, -0.02, 0.01, 0.005, 0.5, 0.2).unwrap();
        let observations =
            synthetic_observations(settlement, &truth, &[1, 2, 3, 4, 5, 7, 10, 15]);

        let config = NssCalibratorConfig {
            least_squares: LeastSquaresConfig::default()
                .with_tolerance(1e-5)
                .with_max_iterations(500),
            ..Default::default()
        };

        let curve = NssCalibrator::with_config(config)
            .calibrate_curve(settlement, &observations, None)
            .unwrap();

        // Monthly nodes to 20 years, plus the settlement node
        assert_eq!(curve.nodes().len(), 241);
        assert_eq!(curve.settlement_date(), settlement);
        assert_eq!(curve.max_date(), settlement.add_months(240).unwrap());
    }
}
