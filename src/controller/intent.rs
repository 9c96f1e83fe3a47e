use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use crate::core::ResolvedRate;
use crate::rates::{RateError, RateSource, resolve_rate};

/// A user action that may affect the exchange rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Pick the invoice currency.
    SetCurrency(String),
    /// Change the issue date (`None` when the field was cleared or unparseable).
    SetIssueDate(Option<NaiveDate>),
    /// Pick the date to take the rate from (`None` clears it).
    SetRateDate(Option<NaiveDate>),
    /// "Use previous business day" button.
    UsePreviousBusinessDay,
    /// "Refresh rate" button.
    Refresh,
}

/// One lookup the controller wants performed.
///
/// Produced by [`InvoiceController::handle`](super::InvoiceController::handle);
/// the result goes back through [`InvoiceController::apply`](super::InvoiceController::apply).
#[derive(Debug, Clone)]
pub struct RateRequest {
    /// Identity of the request; stale generations are never applied.
    pub generation: u64,
    pub currency: String,
    pub target_date: NaiveDate,
    pub max_attempts: u32,
    /// Fires when a newer intent supersedes this request.
    pub cancel: CancellationToken,
}

impl RateRequest {
    /// Run the lookup against `source`.
    pub async fn execute<S>(self, source: &S) -> RateOutcome
    where
        S: RateSource + ?Sized,
    {
        let result = resolve_rate(
            source,
            &self.currency,
            self.target_date,
            self.max_attempts,
            &self.cancel,
        )
        .await;
        RateOutcome {
            generation: self.generation,
            currency: self.currency,
            target_date: self.target_date,
            result,
        }
    }
}

/// Result of a [`RateRequest`], tagged with the request identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateOutcome {
    pub generation: u64,
    pub currency: String,
    pub target_date: NaiveDate,
    pub result: Result<ResolvedRate, RateError>,
}
