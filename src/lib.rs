//! # credito-presumido
//!
//! Audits the presumed ICMS credit ("Crédito Presumido") declared on
//! Brazilian NF-e line items against the Santa Catarina TTD regime
//! (ato DIAT 35/2024).
//!
//! For every `det` element the declared ICMS rate, amounts and NCM are read,
//! the TTD percentage is selected from fixed tables, the credit is
//! recomputed and compared with `vCredPresumido`.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use credito_presumido::core::*;
//! use credito_presumido::ttd;
//! use rust_decimal_macros::dec;
//!
//! let line = InvoiceLine {
//!     item_number: "1".into(),
//!     icms_rate_percent: dec!(10),
//!     icms_value: dec!(50),
//!     product_value: dec!(500),
//!     icms_base: dec!(500),
//!     declared_presumed_credit: dec!(32),
//!     ..Default::default()
//! };
//!
//! let ctx = AuditContext::new(YesNo::No, YesNo::No);
//! let audit = ttd::recalculate(&line, &ctx);
//! assert_eq!(audit.presumed_credit_percent(), Some(dec!(64)));
//! assert_eq!(audit.difference(), Some(dec!(0)));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Line types, context flags, TTD tables and recalculation |
//! | `nfe` | NF-e XML line extraction |
//! | `report` | Result table rows, CSV and JSON export |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod ttd;

#[cfg(feature = "nfe")]
pub mod nfe;

#[cfg(feature = "report")]
pub mod report;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
