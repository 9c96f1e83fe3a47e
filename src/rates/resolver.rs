use chrono::NaiveDate;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::source::{RateSource, SourceError};
use crate::core::ResolvedRate;
use crate::core::dates::shift_date;

/// Days looked up before a resolution is reported as exhausted.
pub const MAX_LOOKUP_ATTEMPTS: u32 = 10;

/// Why a rate could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RateError {
    /// The source failed for a reason other than "no data that day".
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Every day in the lookback window came back without a rate.
    #[error("no {currency} rate found in {attempts} days up to {target_date}")]
    Exhausted {
        currency: String,
        target_date: NaiveDate,
        attempts: u32,
    },

    /// A newer request superseded this one.
    #[error("rate lookup cancelled")]
    Cancelled,
}

impl RateError {
    /// Text shown to the user next to the rate date field.
    pub fn user_message(&self) -> String {
        match self {
            Self::Source(e) => format!("Could not download the exchange rate ({e}). Try again."),
            Self::Exhausted {
                currency,
                target_date,
                attempts,
            } => format!(
                "No {currency} exchange rate was published in the {attempts} days up to {target_date}. Pick another date."
            ),
            Self::Cancelled => "Exchange rate lookup was cancelled.".to_string(),
        }
    }
}

/// Resolve the rate for `currency` on `target_date`, walking back one
/// calendar day at a time while the source has nothing published.
///
/// At most `max_attempts` requests are made. A hard source failure stops the
/// walk at once. The token is checked before every request and raced against
/// the request in flight, so a superseded lookup stops issuing requests.
///
/// # Errors
///
/// [`RateError::Source`] on a hard failure, [`RateError::Exhausted`] when the
/// window holds no rate, [`RateError::Cancelled`] once `cancel` fires.
pub async fn resolve_rate<S>(
    source: &S,
    currency: &str,
    target_date: NaiveDate,
    max_attempts: u32,
    cancel: &CancellationToken,
) -> Result<ResolvedRate, RateError>
where
    S: RateSource + ?Sized,
{
    let mut lookup_date = target_date;

    for attempt in 1..=max_attempts {
        if cancel.is_cancelled() {
            debug!(%currency, %target_date, attempt, "Rate lookup cancelled before request");
            return Err(RateError::Cancelled);
        }

        debug!(%currency, %lookup_date, attempt, "Requesting exchange rate");
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%currency, %lookup_date, "Rate lookup cancelled in flight");
                return Err(RateError::Cancelled);
            }
            result = source.fetch_rate(currency, lookup_date) => result,
        };

        match result {
            Ok(quote) => {
                if cancel.is_cancelled() {
                    return Err(RateError::Cancelled);
                }
                info!(
                    %currency,
                    %target_date,
                    effective_date = %quote.effective_date,
                    mid = %quote.mid,
                    attempts = attempt,
                    "Exchange rate resolved"
                );
                return Ok(ResolvedRate {
                    effective_date: quote.effective_date,
                    value: quote.mid,
                });
            }
            Err(e) if e.is_not_found() => match shift_date(lookup_date, -1) {
                Some(previous) => lookup_date = previous,
                None => break,
            },
            Err(e) => {
                warn!(%currency, %lookup_date, error = %e, "Exchange rate request failed");
                return Err(RateError::Source(e));
            }
        }
    }

    warn!(%currency, %target_date, max_attempts, "No exchange rate in lookback window");
    Err(RateError::Exhausted {
        currency: currency.to_string(),
        target_date,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateQuote;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Answers NotFound for every date except `published`.
    struct OneDay {
        published: NaiveDate,
        requested: Mutex<Vec<NaiveDate>>,
    }

    #[async_trait]
    impl RateSource for OneDay {
        async fn fetch_rate(&self, currency: &str, date: NaiveDate) -> Result<RateQuote, SourceError> {
            self.requested.lock().unwrap().push(date);
            if date == self.published {
                Ok(RateQuote {
                    currency: currency.to_string(),
                    effective_date: date,
                    mid: dec!(4.3),
                    table_no: None,
                })
            } else {
                Err(SourceError::NotFound {
                    currency: currency.to_string(),
                    date,
                })
            }
        }
    }

    #[tokio::test]
    async fn walks_back_to_published_day() {
        let source = OneDay {
            published: date(2024, 3, 15),
            requested: Mutex::new(Vec::new()),
        };
        let rate = resolve_rate(&source, "EUR", date(2024, 3, 17), 10, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(rate.effective_date, date(2024, 3, 15));
        assert_eq!(source.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn cancelled_token_makes_no_requests() {
        let source = OneDay {
            published: date(2024, 3, 15),
            requested: Mutex::new(Vec::new()),
        };
        let token = CancellationToken::new();
        token.cancel();
        let err = resolve_rate(&source, "EUR", date(2024, 3, 15), 10, &token)
            .await
            .unwrap_err();
        assert_eq!(err, RateError::Cancelled);
        assert!(source.requested.lock().unwrap().is_empty());
    }

    #[test]
    fn messages_differ_by_failure_kind() {
        let hard = RateError::Source(SourceError::Network("timeout".into())).user_message();
        let exhausted = RateError::Exhausted {
            currency: "EUR".into(),
            target_date: date(2024, 1, 10),
            attempts: 10,
        }
        .user_message();
        assert!(hard.contains("Could not download"));
        assert!(exhausted.contains("10 days up to 2024-01-10"));
    }
}
