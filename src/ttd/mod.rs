//! Crédito Presumido TTD rules (ato DIAT 35/2024, Santa Catarina).
//!
//! Selects the presumed-credit percentage of an NF-e line from the declared
//! ICMS rate and the caller's context flags, then recomputes the credit.
//!
//! # Example
//!
//! ```rust
//! use credito_presumido::core::*;
//! use credito_presumido::ttd::recalculate;
//! use rust_decimal_macros::dec;
//!
//! let line = InvoiceLine {
//!     item_number: "1".into(),
//!     ncm_code: "74055000".into(),
//!     icms_rate_percent: dec!(4.00),
//!     icms_value: dec!(40),
//!     product_value: dec!(1000),
//!     icms_base: dec!(1000),
//!     benefit_code: "SC850001".into(),
//!     declared_presumed_credit: dec!(30),
//! };
//!
//! let audit = recalculate(&line, &AuditContext::default());
//! assert_eq!(audit.presumed_credit_percent(), Some(dec!(85)));
//! assert_eq!(audit.difference(), Some(dec!(4)));
//! ```

mod ncm;
mod recalc;
mod tables;

pub use ncm::{STEEL_COPPER_NCM_CODES, is_steel_copper_ncm};
pub use recalc::{recalculate, recalculate_all};
pub use tables::{DELTA_TABLE, PERCENT_OF_ICMS_TABLE, PercentRule, delta_percent, percent_of_icms};
