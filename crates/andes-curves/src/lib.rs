//! # Andes Curves
//!
//! Zero-coupon discount curves for the Andes fixed income analytics
//! library.
//!
//! The central type is [`ZeroCouponCurve`]: a settlement date plus a set of
//! dated discount-factor nodes, queried through a pluggable interpolation
//! policy. Curves are immutable; transforms ([`ZeroCouponCurve::bump`],
//! [`ZeroCouponCurve::aged`]) return new curves, so a curve can be shared
//! freely across valuations.
//!
//! [`NssParameters`] is the six-parameter Nelson-Siegel-Svensson zero-rate
//! function; calibrating it against market bonds lives in `andes-bonds`,
//! materializing it as a curve lives here.
//!
//! ## Example
//!
//! ```rust
//! use andes_core::Date;
//! use andes_curves::ZeroCouponCurve;
//!
//! let settlement = Date::from_ymd(2025, 3, 14).unwrap();
//! let curve = ZeroCouponCurve::builder()
//!     .settlement(settlement)
//!     .add_discount_factor(settlement.add_years(1).unwrap(), 0.95)
//!     .add_discount_factor(settlement.add_years(2).unwrap(), 0.90)
//!     .build()
//!     .unwrap();
//!
//! let df = curve.discount_factor(settlement.add_months(18).unwrap()).unwrap();
//! assert!(df > 0.90 && df < 0.95);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

pub mod curve;
pub mod error;
pub mod nss;

pub use curve::{
    CurveNode, Extrapolation, Interpolation, ZeroCouponCurve, ZeroCouponCurveBuilder,
};
pub use error::{CurveError, CurveResult};
pub use nss::NssParameters;
