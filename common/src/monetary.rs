//! Monetary types for fxconvert.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{AmountIssue, CurrencyRole, ValidationError};

/// Largest integer magnitude an amount may have (2^53 - 1).
pub const MAX_SAFE_AMOUNT: u64 = 9_007_199_254_740_991;

/// A validated amount of money, without a currency attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Parse an unsigned decimal literal such as `"100"` or `"12.50"`.
    ///
    /// Signs, exponents, whitespace and bare decimal points are rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if !is_decimal_literal(input) {
            return Err(ValidationError::InvalidAmount(AmountIssue::NotNumeric));
        }

        // Only overflow can fail here once the literal shape is known. Such a
        // literal is still a finite number unless it overflows `f64` as well.
        let value = Decimal::from_str(input).map_err(|_| {
            let issue = match input.parse::<f64>() {
                Ok(v) if v.is_finite() => AmountIssue::ExceedsSafeLimit,
                _ => AmountIssue::NotFinite,
            };
            ValidationError::InvalidAmount(issue)
        })?;

        Self::bounded(value)
    }

    /// Build an amount from a floating-point number.
    ///
    /// Unlike [`Amount::parse`], negative values are allowed.
    pub fn from_f64(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidAmount(AmountIssue::NotFinite));
        }
        if value.abs() > MAX_SAFE_AMOUNT as f64 {
            return Err(ValidationError::InvalidAmount(AmountIssue::ExceedsSafeLimit));
        }

        let value = Decimal::from_f64(value)
            .ok_or(ValidationError::InvalidAmount(AmountIssue::NotFinite))?;

        Self::bounded(value)
    }

    fn bounded(value: Decimal) -> Result<Self, ValidationError> {
        if value.abs() > Decimal::from(MAX_SAFE_AMOUNT) {
            return Err(ValidationError::InvalidAmount(AmountIssue::ExceedsSafeLimit));
        }
        Ok(Self(value))
    }

    /// Get the underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

/// Values accepted wherever an amount is expected.
///
/// Strings must be unsigned decimal literals; numbers must be finite.
/// Both are bounded by [`MAX_SAFE_AMOUNT`].
pub trait IntoAmount {
    fn into_amount(self) -> Result<Amount, ValidationError>;
}

impl IntoAmount for Amount {
    fn into_amount(self) -> Result<Amount, ValidationError> {
        Ok(self)
    }
}

impl IntoAmount for &str {
    fn into_amount(self) -> Result<Amount, ValidationError> {
        Amount::parse(self)
    }
}

impl IntoAmount for &String {
    fn into_amount(self) -> Result<Amount, ValidationError> {
        Amount::parse(self)
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Result<Amount, ValidationError> {
        Amount::parse(&self)
    }
}

impl IntoAmount for f64 {
    fn into_amount(self) -> Result<Amount, ValidationError> {
        Amount::from_f64(self)
    }
}

impl IntoAmount for u32 {
    fn into_amount(self) -> Result<Amount, ValidationError> {
        Ok(Amount::from(self))
    }
}

/// `^\d+(\.\d+)?$` over ASCII digits.
fn is_decimal_literal(input: &str) -> bool {
    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (input, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    all_digits(whole) && fraction.map_or(true, all_digits)
}

/// Uppercase currency code, e.g. `USD`.
///
/// Codes are not checked against ISO 4217; an unknown code is only
/// detected when it is missing from a fetched [`RateTable`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate a currency argument supplied for the given role.
    ///
    /// `None` models an argument that was never supplied.
    pub fn check(role: CurrencyRole, code: Option<&str>) -> Result<Self, ValidationError> {
        let code = code.ok_or(ValidationError::missing_currency(role))?;
        Self::parse(role, code)
    }

    /// Parse a code, normalizing it to uppercase.
    pub fn parse(role: CurrencyRole, code: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency {
                role,
                value: Some(code.to_string()),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Get the code as an uppercase string slice.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Lowercase form, as stored for the converter's current base.
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    pub fn gbp() -> Self {
        Self("GBP".to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Exchange rates relative to a single base currency.
///
/// The base is always present with a rate of exactly 1. Tables are
/// replaced wholesale on every fetch and never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTable {
    base: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateTable {
    /// Create a table for `base` from the quoted rates.
    pub fn new(base: CurrencyCode, rates: impl IntoIterator<Item = (CurrencyCode, Decimal)>) -> Self {
        let mut rates: BTreeMap<CurrencyCode, Decimal> = rates.into_iter().collect();
        rates.insert(base.clone(), Decimal::ONE);

        Self {
            base,
            date: None,
            rates,
        }
    }

    /// Attach the date the rates were quoted for.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Look up a rate by code, case-insensitively.
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates
            .get(&CurrencyCode(code.trim().to_ascii_uppercase()))
            .copied()
    }

    /// Look up a rate by an already-normalized code.
    pub fn rate(&self, code: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    /// All codes in the table, in alphabetical order.
    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.rates.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &Decimal)> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_parse() {
        assert_eq!(Amount::parse("100").unwrap().value(), dec!(100));
        assert_eq!(Amount::parse("12.50").unwrap().value(), dec!(12.50));
        assert_eq!(Amount::parse("0").unwrap().value(), dec!(0));
    }

    #[test]
    fn test_amount_rejects_malformed() {
        for input in ["", "-1", "+1", "1e5", ".5", "5.", "1.2.3", " 1", "1,000", "abc", "NaN"] {
            assert_eq!(
                Amount::parse(input),
                Err(ValidationError::InvalidAmount(AmountIssue::NotNumeric)),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_amount_safe_limit() {
        assert!(Amount::parse("9007199254740991").is_ok());
        assert_eq!(
            Amount::parse("9007199254740992"),
            Err(ValidationError::InvalidAmount(AmountIssue::ExceedsSafeLimit))
        );
        assert_eq!(
            Amount::parse("999999999999999999999999999999999999"),
            Err(ValidationError::InvalidAmount(AmountIssue::ExceedsSafeLimit))
        );
        assert_eq!(
            Amount::parse(&"9".repeat(400)),
            Err(ValidationError::InvalidAmount(AmountIssue::NotFinite))
        );
    }

    #[test]
    fn test_amount_from_f64() {
        assert_eq!(Amount::from_f64(-2.5).unwrap().value(), dec!(-2.5));
        assert_eq!(
            Amount::from_f64(f64::INFINITY),
            Err(ValidationError::InvalidAmount(AmountIssue::NotFinite))
        );
        assert_eq!(
            Amount::from_f64(f64::NAN),
            Err(ValidationError::InvalidAmount(AmountIssue::NotFinite))
        );
        assert_eq!(
            Amount::from_f64(1e16),
            Err(ValidationError::InvalidAmount(AmountIssue::ExceedsSafeLimit))
        );
    }

    #[test]
    fn test_currency_code_check() {
        assert_eq!(
            CurrencyCode::check(CurrencyRole::Base, Some("eur")).unwrap(),
            CurrencyCode::eur()
        );
        assert_eq!(
            CurrencyCode::check(CurrencyRole::Target, None),
            Err(ValidationError::missing_currency(CurrencyRole::Target))
        );
        assert!(matches!(
            CurrencyCode::check(CurrencyRole::Base, Some("")),
            Err(ValidationError::InvalidCurrency { role: CurrencyRole::Base, .. })
        ));
        assert!(CurrencyCode::parse(CurrencyRole::Target, "100").is_err());
    }

    #[test]
    fn test_currency_code_lowercase() {
        let code = CurrencyCode::parse(CurrencyRole::Base, "Gbp").unwrap();
        assert_eq!(code.code(), "GBP");
        assert_eq!(code.to_lowercase(), "gbp");
    }

    #[test]
    fn test_rate_table_includes_base() {
        let table = RateTable::new(
            CurrencyCode::eur(),
            [(CurrencyCode::usd(), dec!(1.08)), (CurrencyCode::gbp(), dec!(0.86))],
        );

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("eur"), Some(Decimal::ONE));
        assert_eq!(table.get("usd"), Some(dec!(1.08)));
        assert_eq!(table.get("JPY"), None);
    }

    #[test]
    fn test_rate_table_base_overrides_quote() {
        let table = RateTable::new(CurrencyCode::usd(), [(CurrencyCode::usd(), dec!(0.99))]);
        assert_eq!(table.rate(&CurrencyCode::usd()), Some(Decimal::ONE));
    }

    #[test]
    fn test_rate_table_serializes_as_map() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let table = RateTable::new(CurrencyCode::eur(), [(CurrencyCode::usd(), dec!(1.08))])
            .with_date(date);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["base"], "EUR");
        assert_eq!(json["date"], "2024-05-17");
        assert_eq!(json["rates"]["USD"], "1.08");
    }

    proptest! {
        #[test]
        fn prop_decimal_literals_accepted(whole in "[0-9]{1,15}", fraction in proptest::option::of("[0-9]{1,6}")) {
            let input = match fraction {
                Some(f) => format!("{whole}.{f}"),
                None => whole,
            };
            let whole_value: u64 = input.split('.').next().unwrap().parse().unwrap();
            prop_assume!(whole_value < MAX_SAFE_AMOUNT);
            prop_assert!(Amount::parse(&input).is_ok());
        }

        #[test]
        fn prop_non_literals_rejected(input in "\\PC*") {
            prop_assume!(!is_decimal_literal(&input));
            prop_assert_eq!(
                Amount::parse(&input),
                Err(ValidationError::InvalidAmount(AmountIssue::NotNumeric))
            );
        }

        #[test]
        fn prop_table_base_is_one(code in "[A-Z]{3}", rate in 1u32..100_000) {
            let base = CurrencyCode::parse(CurrencyRole::Base, &code).unwrap();
            let table = RateTable::new(base.clone(), [(CurrencyCode::usd(), Decimal::new(rate as i64, 4))]);
            prop_assert_eq!(table.rate(&base), Some(Decimal::ONE));
        }
    }
}
