//! Validation error types shared across fxconvert crates.

use std::fmt;

use thiserror::Error;

/// Which side of a conversion a currency code was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyRole {
    /// The currency being converted from.
    Base,
    /// The currency being converted to.
    Target,
}

impl fmt::Display for CurrencyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyRole::Base => write!(f, "Base"),
            CurrencyRole::Target => write!(f, "Target"),
        }
    }
}

/// Reason an amount was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountIssue {
    /// Input is not an unsigned decimal literal.
    NotNumeric,
    /// Input does not fit in a finite value.
    NotFinite,
    /// Magnitude is above 2^53 - 1.
    ExceedsSafeLimit,
}

impl fmt::Display for AmountIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountIssue::NotNumeric => write!(f, "Amount must be a number"),
            AmountIssue::NotFinite => write!(f, "Amount must be a finite number"),
            AmountIssue::ExceedsSafeLimit => write!(f, "Amount exceeds safe limit"),
        }
    }
}

/// Errors raised while validating user input, before any rate is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Malformed, non-finite or oversized amount.
    #[error("{0}")]
    InvalidAmount(AmountIssue),

    /// Missing or malformed currency code.
    #[error(
        "{role} currency must be specified as a currency code{}",
        .value.as_ref().map(|v| format!(", got {v:?}")).unwrap_or_default()
    )]
    InvalidCurrency {
        role: CurrencyRole,
        value: Option<String>,
    },
}

impl ValidationError {
    /// Shorthand for a currency argument that was not supplied at all.
    pub fn missing_currency(role: CurrencyRole) -> Self {
        ValidationError::InvalidCurrency { role, value: None }
    }
}
