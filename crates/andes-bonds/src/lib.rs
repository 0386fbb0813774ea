//! # Andes Bonds
//!
//! Bond and deposit valuation for the Andes fixed income analytics
//! library, with the Chilean local-market specializations.
//!
//! - [`CouponSchedule`]: the amortization/interest structure a bond pays
//! - [`Bond`]: present value against a flat yield or a discount curve,
//!   IRR solving, Macaulay duration, DV01
//! - [`ClBond`]: the Chilean extension - TERA, par value, price and
//!   settlement amount under local rounding rules
//! - [`Deposit`]: single-flow money-market instrument
//! - [`NssCalibrator`]: fits Nelson-Siegel-Svensson parameters to a basket
//!   of bonds and observed yields, producing a discount curve
//!
//! Instruments are read-only descriptions: they own no curve, so one bond
//! can be priced against many curves without copying.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

pub mod bond;
pub mod calibration;
pub mod chile;
pub mod coupons;
pub mod deposit;
pub mod error;

pub use bond::{Bond, DEFAULT_IRR_BRACKET};
pub use calibration::{NssCalibrator, NssCalibratorConfig};
pub use chile::ClBond;
pub use coupons::{Coupon, CouponSchedule};
pub use deposit::Deposit;
pub use error::{BondError, BondResult};
