//! Core audit types, context flags, and errors.
//!
//! These types are shared by the NF-e extractor, the TTD recalculator and
//! the report layer.

mod context;
mod error;
mod types;

pub use context::*;
pub use error::*;
pub use types::*;
