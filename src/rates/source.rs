use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One published mid rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    /// Currency code as reported by the source.
    pub currency: String,
    /// Publication date reported by the source. Authoritative: it may differ
    /// from the requested date.
    pub effective_date: NaiveDate,
    /// PLN per one unit of `currency`.
    pub mid: Decimal,
    /// Table number (e.g. "052/A/NBP/2024"), when the source provides one.
    pub table_no: Option<String>,
}

/// Error from a single rate request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// No rate was published for that date (weekend or holiday).
    #[error("no {currency} rate published on {date}")]
    NotFound { currency: String, date: NaiveDate },

    /// The source answered with an unexpected HTTP status.
    #[error("rate source returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection or timeout problem.
    #[error("rate source network error: {0}")]
    Network(String),

    /// The response could not be understood.
    #[error("rate source response could not be parsed: {0}")]
    Parse(String),
}

impl SourceError {
    /// True for "nothing published that day", the only retryable case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A provider of daily reference rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the rate of `currency` published on `date`.
    ///
    /// Must return [`SourceError::NotFound`] when the source has no rate for
    /// that day, and another variant for every other failure.
    async fn fetch_rate(&self, currency: &str, date: NaiveDate) -> Result<RateQuote, SourceError>;
}
