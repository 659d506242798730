//! Currency conversion types and operations.

use fxconvert_common::{
    Amount, AmountIssue, CurrencyCode, CurrencyRole, IntoAmount, RateTable, ValidationError,
};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::Converter;
use crate::error::{FxError, FxResult};

/// Decimal places of every converted amount.
pub const RESULT_DECIMAL_PLACES: u32 = 2;

/// Convert `amount` through a table's implicit unit.
///
/// `amount / from_rate` normalizes to the table's base, multiplying by
/// `to_rate` lands in the target. The result is rounded half away from zero.
pub fn cross_convert(amount: Decimal, from_rate: Decimal, to_rate: Decimal) -> FxResult<Decimal> {
    amount
        .checked_div(from_rate)
        .and_then(|normalized| normalized.checked_mul(to_rate))
        .map(|value| {
            value.round_dp_with_strategy(RESULT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        })
        .ok_or(FxError::Validation(ValidationError::InvalidAmount(
            AmountIssue::NotFinite,
        )))
}

/// Request to perform a conversion, validated on construction.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Amount to convert.
    pub amount: Amount,
    /// Currency the amount is in.
    pub from: CurrencyCode,
    /// Currency to convert into.
    pub to: CurrencyCode,
}

impl ConversionRequest {
    /// Create a new conversion request.
    pub fn new(amount: Amount, from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { amount, from, to }
    }

    /// Validate raw arguments, amount first.
    pub fn parse(amount: impl IntoAmount, from: &str, to: &str) -> FxResult<Self> {
        let amount = amount.into_amount()?;
        let from = CurrencyCode::parse(CurrencyRole::Base, from)?;
        let to = CurrencyCode::parse(CurrencyRole::Target, to)?;
        Ok(Self::new(amount, from, to))
    }

    /// Apply a table fetched for `self.from`.
    ///
    /// A zero rate counts as missing.
    pub fn apply(&self, table: &RateTable) -> FxResult<Decimal> {
        let from_rate = table
            .rate(&self.from)
            .filter(|r| !r.is_zero())
            .ok_or_else(|| FxError::CurrencyNotFound {
                role: CurrencyRole::Base,
                code: self.from.code().to_string(),
            })?;

        let to_rate = table
            .rate(&self.to)
            .filter(|r| !r.is_zero())
            .ok_or_else(|| FxError::CurrencyNotFound {
                role: CurrencyRole::Target,
                code: self.to.code().to_string(),
            })?;

        cross_convert(self.amount.value(), from_rate, to_rate)
    }
}

/// First step of `converter.amount(x).from(base).to(target)`.
pub struct AmountStep<'a> {
    converter: &'a Converter,
    amount: Result<Amount, ValidationError>,
}

impl<'a> AmountStep<'a> {
    pub(crate) fn new(converter: &'a Converter, amount: impl IntoAmount) -> Self {
        Self {
            converter,
            amount: amount.into_amount(),
        }
    }

    /// Choose the source currency.
    ///
    /// This also makes `base` the converter's current base currency, so a
    /// later [`Converter::rates`] call returns rates for it. The amount
    /// itself is only checked when [`TargetStep::to`] runs.
    pub fn from(self, base: &str) -> FxResult<TargetStep<'a>> {
        let base = CurrencyCode::parse(CurrencyRole::Base, base)?;
        self.converter.set_base_currency(&base);

        Ok(TargetStep {
            converter: self.converter,
            amount: self.amount,
            from: base,
        })
    }
}

/// Second step of the chained conversion.
pub struct TargetStep<'a> {
    converter: &'a Converter,
    amount: Result<Amount, ValidationError>,
    from: CurrencyCode,
}

impl TargetStep<'_> {
    /// Currency the amount will be converted from.
    pub fn base(&self) -> &CurrencyCode {
        &self.from
    }

    /// Fetch rates and convert into `target`.
    pub async fn to(self, target: &str) -> FxResult<Decimal> {
        let amount = self.amount?;
        let to = CurrencyCode::parse(CurrencyRole::Target, target)?;

        self.converter
            .execute(ConversionRequest::new(amount, self.from, to))
            .await
    }
}
