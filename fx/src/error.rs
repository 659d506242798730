//! FX error types.

use fxconvert_common::{CurrencyRole, ValidationError};
use thiserror::Error;

/// Errors that can occur while fetching rates or converting amounts.
#[derive(Debug, Error)]
pub enum FxError {
    /// Amount or currency argument failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Currency code missing from the fetched rate table.
    #[error("{role} currency {code} not found")]
    CurrencyNotFound { role: CurrencyRole, code: String },

    /// Rate service reported an error message, or answered with an unusable body.
    #[error("Rate service error: {0}")]
    Remote(String),

    /// Request could not be sent or its body could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Converter configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FxError {
    /// Check if this error may go away when the same request is repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FxError::Transport(_))
    }

    /// Stable error code for logs and machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::Validation(ValidationError::InvalidAmount(_)) => "INVALID_AMOUNT",
            FxError::Validation(ValidationError::InvalidCurrency { .. }) => "INVALID_CURRENCY",
            FxError::CurrencyNotFound { .. } => "CURRENCY_NOT_FOUND",
            FxError::Remote(_) => "REMOTE_ERROR",
            FxError::Transport(_) => "TRANSPORT_ERROR",
            FxError::Config(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<reqwest::Error> for FxError {
    fn from(err: reqwest::Error) -> Self {
        FxError::Transport(err.to_string())
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
