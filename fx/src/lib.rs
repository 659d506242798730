//! fxconvert FX Engine
//!
//! Currency conversion over live exchange rates.
//!
//! # Features
//!
//! - Latest rate tables from a Frankfurter-compatible service
//! - Conversion between any two quoted currencies, rounded to cents
//! - Conversion into every quoted currency at once
//! - Chained `amount(..).from(..).to(..)` conversions
//! - Positional dispatch for command-line style callers
//!
//! # Example
//!
//! ```rust,ignore
//! use fxconvert_fx::{Converter, ConverterConfig};
//!
//! let converter = Converter::frankfurter(ConverterConfig::default())?;
//!
//! // Rates for the default base (USD)
//! let rates = converter.rates().await?;
//!
//! // Convert an amount
//! let usd = converter.convert("100", "EUR", "USD").await?;
//! let same = converter.amount("100").from("EUR")?.to("USD").await?;
//! ```

pub mod engine;
pub mod provider;
pub mod frankfurter;
pub mod conversion;
pub mod dispatch;
pub mod config;
pub mod error;

pub use engine::{Converter, ConverterState};
pub use provider::RateProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
pub use frankfurter::FrankfurterProvider;
pub use conversion::{AmountStep, ConversionRequest, TargetStep};
pub use dispatch::Dispatched;
pub use config::ConverterConfig;
pub use error::{FxError, FxResult};
