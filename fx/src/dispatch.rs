//! Positional-argument front door over the converter.
//!
//! `dispatch(query, from, to)` picks an operation from which arguments are
//! present, the way a command line or scripting binding would call it:
//!
//! | query        | from | to   | result                          |
//! |--------------|------|------|---------------------------------|
//! | none         | -    | -    | rates for the current base      |
//! | non-numeric  | none | none | rates for `query`               |
//! | amount       | some | none | `query` in every currency       |
//! | amount       | some | some | `query` converted to `to`       |
//! | numeric      | none | none | builder awaiting `from` / `to`  |

use std::collections::BTreeMap;

use fxconvert_common::{CurrencyCode, CurrencyRole, RateTable, ValidationError};
use rust_decimal::Decimal;
use tracing::debug;

use crate::conversion::AmountStep;
use crate::engine::Converter;
use crate::error::FxResult;

/// Outcome of [`Converter::dispatch`].
pub enum Dispatched<'a> {
    /// A full rate table.
    Rates(RateTable),
    /// The amount in every currency of the source table.
    ConvertedAll(BTreeMap<CurrencyCode, Decimal>),
    /// A single converted amount.
    Converted(Decimal),
    /// An amount still waiting for its currencies.
    Builder(AmountStep<'a>),
}

impl std::fmt::Debug for Dispatched<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatched::Rates(table) => f.debug_tuple("Rates").field(table).finish(),
            Dispatched::ConvertedAll(map) => f.debug_tuple("ConvertedAll").field(map).finish(),
            Dispatched::Converted(value) => f.debug_tuple("Converted").field(value).finish(),
            Dispatched::Builder(_) => f.write_str("Builder"),
        }
    }
}

/// Whether a query reads as a number rather than a currency code.
///
/// Blank strings count as numbers (zero); `NaN` does not. The only
/// infinities are the exact spellings `Infinity`, `+Infinity` and
/// `-Infinity`, so codes like `inf` stay currency lookups.
pub fn is_numeric_query(query: &str) -> bool {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return true;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => true,
        Ok(value) if value.is_infinite() => {
            trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed) == "Infinity"
        }
        _ => false,
    }
}

impl Converter {
    /// Route positional arguments to the matching operation.
    ///
    /// A target without a source currency is rejected as a missing base.
    pub async fn dispatch(
        &self,
        query: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> FxResult<Dispatched<'_>> {
        let Some(query) = query else {
            debug!("Dispatching to current base rates");
            return self.rates().await.map(Dispatched::Rates);
        };

        match (from, to) {
            (None, None) if !is_numeric_query(query) => {
                debug!(currency = query, "Dispatching to rate lookup");
                self.rates_for(query).await.map(Dispatched::Rates)
            }
            (Some(from), None) => {
                debug!(from, "Dispatching to convert-all");
                self.convert_all(query, from)
                    .await
                    .map(Dispatched::ConvertedAll)
            }
            (Some(from), Some(to)) => {
                debug!(from, to, "Dispatching to single conversion");
                self.convert(query, from, to).await.map(Dispatched::Converted)
            }
            (None, Some(_)) => Err(ValidationError::missing_currency(CurrencyRole::Base).into()),
            (None, None) => Ok(Dispatched::Builder(self.amount(query))),
        }
    }
}
