//! Main converter implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use fxconvert_common::{CurrencyCode, CurrencyRole, IntoAmount, RateTable};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::config::ConverterConfig;
use crate::conversion::{AmountStep, ConversionRequest};
use crate::error::FxResult;
use crate::frankfurter::FrankfurterProvider;
use crate::provider::RateProvider;

/// Mutable part of a converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterState {
    /// Current base currency, lowercase.
    pub base_currency: String,
    /// Table from the most recent successful fetch.
    pub exchange_rates: Option<RateTable>,
}

/// Currency converter backed by a rate provider.
///
/// Every operation fetches fresh rates; nothing is served from the stored
/// table. Each successful fetch replaces the stored table and base currency,
/// last writer wins when calls overlap.
pub struct Converter {
    provider: Arc<dyn RateProvider>,
    state: RwLock<ConverterState>,
}

impl Converter {
    /// Create a converter over the given provider.
    pub fn new(provider: Arc<dyn RateProvider>, config: &ConverterConfig) -> Self {
        Self {
            provider,
            state: RwLock::new(ConverterState {
                base_currency: config.default_base.to_lowercase(),
                exchange_rates: None,
            }),
        }
    }

    /// Create a converter talking to the configured Frankfurter endpoint.
    pub fn frankfurter(config: ConverterConfig) -> FxResult<Self> {
        let provider = Arc::new(FrankfurterProvider::new(config.clone())?);
        Ok(Self::new(provider, &config))
    }

    /// Current base currency, lowercase.
    pub fn base_currency(&self) -> String {
        self.state.read().base_currency.clone()
    }

    /// Table from the most recent successful fetch, if any.
    pub fn exchange_rates(&self) -> Option<RateTable> {
        self.state.read().exchange_rates.clone()
    }

    /// Snapshot of the whole state.
    pub fn state(&self) -> ConverterState {
        self.state.read().clone()
    }

    pub(crate) fn set_base_currency(&self, base: &CurrencyCode) {
        debug!(base = %base, "Base currency set");
        self.state.write().base_currency = base.to_lowercase();
    }

    /// Fetch rates for `currency` and store them as the current table.
    #[instrument(skip(self, currency), fields(currency = %currency, provider = self.provider.name()))]
    pub async fn fetch_rates(&self, currency: &CurrencyCode) -> FxResult<RateTable> {
        let table = self.provider.latest(currency).await?;

        debug!(currencies = table.len(), date = ?table.date(), "Fetched rates");

        {
            let mut state = self.state.write();
            state.base_currency = currency.to_lowercase();
            state.exchange_rates = Some(table.clone());
        }

        Ok(table)
    }

    /// Rates for the current base currency (`usd` until something changes it).
    pub async fn rates(&self) -> FxResult<RateTable> {
        let base = self.base_currency();
        let base = CurrencyCode::parse(CurrencyRole::Base, &base)?;
        self.fetch_rates(&base).await
    }

    /// Rates relative to `currency`.
    pub async fn rates_for(&self, currency: &str) -> FxResult<RateTable> {
        let currency = CurrencyCode::parse(CurrencyRole::Base, currency)?;
        self.fetch_rates(&currency).await
    }

    /// Convert `amount` from one currency to another, rounded to cents.
    #[instrument(skip(self, amount))]
    pub async fn convert(&self, amount: impl IntoAmount, from: &str, to: &str) -> FxResult<Decimal> {
        let request = ConversionRequest::parse(amount, from, to)?;
        self.execute(request).await
    }

    /// Convert `amount` into every currency quoted against `from`.
    ///
    /// Each target goes through a full conversion of its own, fetched
    /// concurrently; the first failure fails the whole map.
    #[instrument(skip(self, amount))]
    pub async fn convert_all(
        &self,
        amount: impl IntoAmount,
        from: &str,
    ) -> FxResult<BTreeMap<CurrencyCode, Decimal>> {
        let from = CurrencyCode::parse(CurrencyRole::Base, from)?;
        let table = self.fetch_rates(&from).await?;
        let amount = amount.into_amount()?;

        let conversions = table.codes().cloned().map(|target| {
            let request = ConversionRequest::new(amount, from.clone(), target.clone());
            async move { self.execute(request).await.map(|value| (target, value)) }
        });

        let converted: BTreeMap<_, _> = try_join_all(conversions).await?.into_iter().collect();

        info!(from = %from, targets = converted.len(), "Converted to all currencies");

        Ok(converted)
    }

    /// Start a chained conversion: `amount(x).from(base)?.to(target).await`.
    pub fn amount(&self, amount: impl IntoAmount) -> AmountStep<'_> {
        AmountStep::new(self, amount)
    }

    /// Fetch rates for the request's source currency and apply them.
    pub(crate) async fn execute(&self, request: ConversionRequest) -> FxResult<Decimal> {
        let table = self.fetch_rates(&request.from).await?;
        let value = request.apply(&table)?;

        info!(
            amount = %request.amount,
            from = %request.from,
            to = %request.to,
            result = %value,
            "Conversion completed"
        );

        Ok(value)
    }
}
