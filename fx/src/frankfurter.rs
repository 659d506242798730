//! HTTP rate provider for the Frankfurter API.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use fxconvert_common::{CurrencyCode, CurrencyRole, RateTable};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::ConverterConfig;
use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

/// Body of `GET /latest?from=XXX`.
///
/// Error responses carry only `message`.
#[derive(Debug, Deserialize)]
pub struct LatestResponse {
    pub base: Option<String>,
    pub date: Option<NaiveDate>,
    pub rates: Option<HashMap<String, Decimal>>,
    pub message: Option<String>,
}

impl LatestResponse {
    /// Turn the body into a rate table, surfacing upstream error messages.
    pub fn into_table(self) -> FxResult<RateTable> {
        if let Some(message) = self.message.filter(|m| !m.is_empty()) {
            warn!(message = %message, "Rate service returned an error");
            return Err(FxError::Remote(message));
        }

        let (Some(base), Some(rates)) = (self.base, self.rates) else {
            return Err(FxError::Remote(
                "response is missing base or rates".to_string(),
            ));
        };

        let base = CurrencyCode::parse(CurrencyRole::Base, &base)
            .map_err(|e| FxError::Remote(format!("unexpected base in response: {e}")))?;

        let rates = rates
            .into_iter()
            .map(|(code, rate)| {
                CurrencyCode::parse(CurrencyRole::Target, &code)
                    .map(|code| (code, rate))
                    .map_err(|e| FxError::Remote(format!("unexpected code in response: {e}")))
            })
            .collect::<FxResult<Vec<_>>>()?;

        let table = RateTable::new(base, rates);
        Ok(match self.date {
            Some(date) => table.with_date(date),
            None => table,
        })
    }
}

/// Fetches latest rates from a Frankfurter instance.
pub struct FrankfurterProvider {
    client: Client,
    config: ConverterConfig,
}

impl FrankfurterProvider {
    /// Create a provider for the configured endpoint.
    pub fn new(config: ConverterConfig) -> FxResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FxError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "frankfurter"
    }

    #[instrument(skip(self, base), fields(base = %base))]
    async fn latest(&self, base: &CurrencyCode) -> FxResult<RateTable> {
        let url = self.config.latest_url(base);
        debug!(url = %url, "Requesting latest rates");

        // Error bodies arrive with non-2xx statuses; `message` decides.
        let body: LatestResponse = self.client.get(&url).send().await?.json().await?;

        body.into_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(body: &str) -> FxResult<RateTable> {
        serde_json::from_str::<LatestResponse>(body)
            .expect("valid json")
            .into_table()
    }

    #[test]
    fn test_parse_latest() {
        let table = parse(
            r#"{"amount":1.0,"base":"EUR","date":"2024-05-17","rates":{"GBP":0.8571,"USD":1.0866}}"#,
        )
        .unwrap();

        assert_eq!(table.base(), &CurrencyCode::eur());
        assert_eq!(table.date(), NaiveDate::from_ymd_opt(2024, 5, 17));
        assert_eq!(table.get("EUR"), Some(Decimal::ONE));
        assert_eq!(table.get("usd"), Some(dec!(1.0866)));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_parse_error_message() {
        let result = parse(r#"{"message":"not found"}"#);
        assert!(matches!(result, Err(FxError::Remote(m)) if m == "not found"));
    }

    #[test]
    fn test_parse_missing_rates() {
        let result = parse(r#"{"base":"EUR"}"#);
        assert!(matches!(result, Err(FxError::Remote(_))));
    }

    #[test]
    fn test_empty_message_is_not_an_error() {
        let table = parse(r#"{"base":"USD","rates":{"EUR":0.92},"message":""}"#).unwrap();
        assert_eq!(table.get("USD"), Some(Decimal::ONE));
    }

    #[test]
    fn test_provider_rejects_bad_config() {
        let config = ConverterConfig::default().with_endpoint("not a url");
        assert!(matches!(
            FrankfurterProvider::new(config),
            Err(FxError::Config(_))
        ));
    }
}
