//! fxconvert Common Types
//!
//! Shared types for fxconvert: validated amounts, currency codes,
//! exchange-rate tables and the validation errors raised for bad input.

pub mod monetary;
pub mod error;

pub use monetary::*;
pub use error::*;
