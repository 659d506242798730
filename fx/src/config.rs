//! Converter configuration.

use fxconvert_common::{CurrencyCode, CurrencyRole};

use crate::error::{FxError, FxResult};

/// Public Frankfurter instance.
pub const DEFAULT_ENDPOINT: &str = "https://api.frankfurter.app";

/// Configuration for the converter and its HTTP rate provider.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Base URL of the rate service, without the `/latest` path.
    pub endpoint: String,
    /// Base currency used before any fetch sets one.
    pub default_base: String,
    /// User agent sent with rate requests.
    pub user_agent: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_base: "usd".to_string(),
            user_agent: concat!("fxconvert/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ConverterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("FX_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Ok(base) = std::env::var("FX_DEFAULT_BASE") {
            config.default_base = base.to_lowercase();
        }

        if let Ok(agent) = std::env::var("FX_USER_AGENT") {
            config.user_agent = agent;
        }

        config
    }

    /// Override the rate service endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> FxResult<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(FxError::Config("Endpoint cannot be empty".to_string()));
        }

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(FxError::Config(format!(
                "Endpoint must be an http(s) URL, got {endpoint}"
            )));
        }

        CurrencyCode::parse(CurrencyRole::Base, &self.default_base)
            .map_err(|e| FxError::Config(format!("Invalid default base: {e}")))?;

        Ok(())
    }

    /// URL of the latest-rates resource for `base`.
    pub fn latest_url(&self, base: &CurrencyCode) -> String {
        format!(
            "{}/latest?from={}",
            self.endpoint.trim().trim_end_matches('/'),
            base.code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_base, "usd");
    }

    #[test]
    fn test_invalid_config() {
        let config = ConverterConfig::default().with_endpoint("");
        assert!(matches!(config.validate(), Err(FxError::Config(_))));

        let config = ConverterConfig::default().with_endpoint("ftp://rates.example");
        assert!(config.validate().is_err());

        let config = ConverterConfig {
            default_base: "u-s-d".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_latest_url() {
        let config = ConverterConfig::default();
        assert_eq!(
            config.latest_url(&CurrencyCode::eur()),
            "https://api.frankfurter.app/latest?from=EUR"
        );

        let config = config.with_endpoint("http://localhost:8080/");
        assert_eq!(
            config.latest_url(&CurrencyCode::usd()),
            "http://localhost:8080/latest?from=USD"
        );
    }
}
