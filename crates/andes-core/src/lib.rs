//! # Andes Core
//!
//! Core types for the Andes fixed income analytics library.
//!
//! This crate provides the building blocks used throughout Andes:
//!
//! - **Types**: `Date`, `CashFlow`, `Rate`, `RateConvention`
//! - **Day Count Conventions**: year-fraction calculations between dates
//! - **Errors**: the shared domain/configuration error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use andes_core::prelude::*;
//!
//! let convention = RateConvention::compounded(1.0, DayCount::Act365).unwrap();
//! let rate = Rate::new(0.05, convention);
//!
//! // One unit invested for two years at 5% compounded annually
//! let wf = rate.wealth_factor(2.0).unwrap();
//! assert!((wf - 1.1025).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

pub mod daycounts;
pub mod error;
pub mod types;

pub use daycounts::DayCount;
pub use error::{CoreError, CoreResult};
pub use types::{CashFlow, Date, InterestConvention, Rate, RateConvention};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::DayCount;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{CashFlow, Date, InterestConvention, Rate, RateConvention};
}
