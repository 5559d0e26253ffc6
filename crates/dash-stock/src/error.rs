//! Error types for dashboard operations
//!
//! The taxonomy mirrors how each failure is surfaced: a [`DateRangeError`]
//! blocks the whole request, a [`RemoteDataError`] degrades a single section,
//! an [`InsufficientDataError`] suppresses only the CAGR figure and an
//! [`EmptyInputError`] never leaves the analytics layer.

use chrono::NaiveDate;
use thiserror::Error;

/// User input ordering violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    /// The start date is on or after the end date
    #[error("Start date must be earlier than the end date ({start} >= {end})")]
    StartNotBeforeEnd { start: NaiveDate, end: NaiveDate },
}

/// Any failure of a market data provider call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteDataError {
    /// Connection, TLS or HTTP-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The call did not complete within the configured timeout
    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: String },

    /// The provider does not know the symbol
    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    /// The provider throttled the request
    #[error("Rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    /// The response did not have the expected shape
    #[error("Unexpected response: {0}")]
    Schema(String),

    /// The provider answered but had nothing for this dataset
    #[error("No {dataset} data for {symbol}")]
    Empty { symbol: String, dataset: String },
}

impl RemoteDataError {
    /// Shorthand for an empty result
    pub fn empty(symbol: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self::Empty {
            symbol: symbol.into(),
            dataset: dataset.into(),
        }
    }
}

impl From<reqwest::Error> for RemoteDataError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| format!("{}{}", u.host_str().unwrap_or_default(), u.path()))
            .unwrap_or_else(|| "provider".to_string());

        if err.is_timeout() {
            return Self::Timeout { endpoint };
        }
        match err.status().map(|s| s.as_u16()) {
            Some(404) => Self::UnknownTicker(endpoint),
            Some(429) => Self::RateLimited {
                provider: "Yahoo Finance".to_string(),
            },
            _ if err.is_decode() => Self::Schema(err.to_string()),
            _ => Self::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RemoteDataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

impl From<yahoo_finance_api::YahooError> for RemoteDataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        let message = err.to_string();
        let lower = message.to_lowercase();
        if lower.contains("no data") || lower.contains("not found") {
            Self::UnknownTicker(message)
        } else if lower.contains("too many requests") || lower.contains("429") {
            Self::RateLimited {
                provider: "Yahoo Finance".to_string(),
            }
        } else {
            Self::Network(message)
        }
    }
}

/// CAGR cannot be computed from the supplied prices
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsufficientDataError {
    /// Fewer than two closing prices
    #[error("At least 2 price points are required, found {found}")]
    TooFewPoints { found: usize },

    /// The first price is zero, negative or not a number
    #[error("Start price must be positive, got {price}")]
    NonPositiveStart { price: f64 },

    /// The last price is negative or not a number
    #[error("End price must be a non-negative number, got {price}")]
    InvalidEndPrice { price: f64 },
}

/// Sentiment was requested over zero headlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No headlines to score")]
pub struct EmptyInputError;

/// Dashboard-level errors
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Invalid date range
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Provider failure
    #[error(transparent)]
    RemoteData(#[from] RemoteDataError),

    /// Not enough prices for a metric
    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidTicker(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTML page rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = DateRangeError::StartNotBeforeEnd { start, end: start };
        assert_eq!(
            err.to_string(),
            "Start date must be earlier than the end date (2024-03-01 >= 2024-03-01)"
        );

        let err = RemoteDataError::empty("AAPL", "holders");
        assert_eq!(err.to_string(), "No holders data for AAPL");

        let err = InsufficientDataError::TooFewPoints { found: 1 };
        assert_eq!(err.to_string(), "At least 2 price points are required, found 1");
    }

    #[test]
    fn test_error_conversion() {
        let err: DashboardError = RemoteDataError::Schema("missing chart".to_string()).into();
        match err {
            DashboardError::RemoteData(RemoteDataError::Schema(msg)) => {
                assert_eq!(msg, "missing chart");
            }
            other => panic!("Expected RemoteData variant, got {other:?}"),
        }

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(RemoteDataError::from(json_err), RemoteDataError::Schema(_)));
    }
}
