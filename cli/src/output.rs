//! Rendering of dispatch results.

use std::collections::BTreeMap;

use fxconvert_common::{CurrencyCode, RateTable};
use fxconvert_fx::Dispatched;
use rust_decimal::Decimal;
use serde::Serialize;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Render a finished result. Builders have nothing to print.
pub fn render(result: &Dispatched<'_>, format: Format) -> anyhow::Result<String> {
    match (result, format) {
        (Dispatched::Rates(table), Format::Text) => Ok(rates_text(table)),
        (Dispatched::Rates(table), Format::Json) => {
            Ok(serde_json::to_string_pretty(&RatesJson::from(table))?)
        }
        (Dispatched::ConvertedAll(map), Format::Text) => Ok(amounts_text(map)),
        (Dispatched::ConvertedAll(map), Format::Json) => Ok(serde_json::to_string_pretty(
            &numbers(map.iter()),
        )?),
        (Dispatched::Converted(value), Format::Text) => Ok(value.to_string()),
        (Dispatched::Converted(value), Format::Json) => {
            Ok(serde_json::to_string(&Number(*value))?)
        }
        (Dispatched::Builder(_), _) => Err(anyhow::anyhow!("incomplete conversion")),
    }
}

/// Decimal written as a JSON number.
#[derive(Serialize)]
#[serde(transparent)]
struct Number(#[serde(with = "rust_decimal::serde::float")] Decimal);

#[derive(Serialize)]
struct RatesJson<'a> {
    base: &'a CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    rates: BTreeMap<&'a CurrencyCode, Number>,
}

impl<'a> From<&'a RateTable> for RatesJson<'a> {
    fn from(table: &'a RateTable) -> Self {
        Self {
            base: table.base(),
            date: table.date().map(|d| d.to_string()),
            rates: numbers(table.iter()),
        }
    }
}

fn numbers<'a>(
    rows: impl Iterator<Item = (&'a CurrencyCode, &'a Decimal)>,
) -> BTreeMap<&'a CurrencyCode, Number> {
    rows.map(|(code, value)| (code, Number(*value))).collect()
}

fn rates_text(table: &RateTable) -> String {
    let mut out = match table.date() {
        Some(date) => format!("Rates for {} on {}\n", table.base(), date),
        None => format!("Rates for {}\n", table.base()),
    };
    out.push_str(&columns(table.iter()));
    out
}

fn amounts_text(map: &BTreeMap<CurrencyCode, Decimal>) -> String {
    columns(map.iter())
}

fn columns<'a>(rows: impl Iterator<Item = (&'a CurrencyCode, &'a Decimal)>) -> String {
    rows.map(|(code, value)| format!("{code:<4} {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
