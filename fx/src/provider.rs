//! Rate provider trait and test implementation.

use async_trait::async_trait;
use fxconvert_common::{CurrencyCode, RateTable};

use crate::error::FxResult;

/// Source of exchange-rate tables.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the latest rates relative to `base`.
    ///
    /// The returned table always contains `base` mapped to 1.
    async fn latest(&self, base: &CurrencyCode) -> FxResult<RateTable>;
}

/// Mock rate provider for testing.
///
/// Rates are stored relative to USD and re-based on every request, so
/// any stored currency can be asked for as a base.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    name: String,
    usd_rates: dashmap::DashMap<CurrencyCode, rust_decimal::Decimal>,
    failure: parking_lot::Mutex<Option<String>>,
    fetches: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Create a new mock provider that only knows USD.
    pub fn new(name: impl Into<String>) -> Self {
        let usd_rates = dashmap::DashMap::new();
        usd_rates.insert(CurrencyCode::usd(), rust_decimal::Decimal::ONE);

        Self {
            name: name.into(),
            usd_rates,
            failure: parking_lot::Mutex::new(None),
            fetches: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Set how many units of `code` one USD buys.
    pub fn set_rate(&self, code: &str, per_usd: rust_decimal::Decimal) {
        let code = CurrencyCode::parse(fxconvert_common::CurrencyRole::Target, code)
            .expect("mock rates use valid codes");
        self.usd_rates.insert(code, per_usd);
    }

    /// Make every following request fail with an upstream error message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    /// Number of requests served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn latest(&self, base: &CurrencyCode) -> FxResult<RateTable> {
        self.fetches
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if let Some(message) = self.failure.lock().clone() {
            return Err(crate::error::FxError::Remote(message));
        }

        let base_per_usd = self
            .usd_rates
            .get(base)
            .map(|r| *r)
            .ok_or_else(|| crate::error::FxError::Remote("not found".to_string()))?;

        let rates: Vec<_> = self
            .usd_rates
            .iter()
            .filter(|entry| entry.key() != base)
            .map(|entry| (entry.key().clone(), *entry.value() / base_per_usd))
            .collect();

        Ok(RateTable::new(base.clone(), rates))
    }
}
