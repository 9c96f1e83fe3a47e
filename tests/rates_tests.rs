#![cfg(feature = "rates")]

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{HangingSource, TableSource, date};
use faktura_pl::rates::*;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Walk-back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_on_target_day_needs_one_lookup() {
    let source = TableSource::new().publish(date(2024, 3, 15), dec!(4.3213));
    let rate = resolve_rate(&source, "EUR", date(2024, 3, 15), 10, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(rate.effective_date, date(2024, 3, 15));
    assert_eq!(rate.value, dec!(4.3213));
    assert_eq!(source.calls(), vec![date(2024, 3, 15)]);
}

#[tokio::test]
async fn three_missing_days_then_success() {
    // Easter Monday and the weekend before it have no table; Good Friday does.
    let source = TableSource::new().publish(date(2024, 3, 29), dec!(4.31));
    let rate = resolve_rate(&source, "EUR", date(2024, 4, 1), 10, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        source.calls(),
        vec![date(2024, 4, 1), date(2024, 3, 31), date(2024, 3, 30), date(2024, 3, 29)]
    );
    assert_eq!(rate.effective_date, date(2024, 3, 29));
}

#[tokio::test]
async fn saturday_resolves_to_friday() {
    let source = TableSource::new()
        .publish(date(2024, 3, 15), dec!(4.32))
        .publish(date(2024, 3, 14), dec!(4.30));
    let rate = resolve_rate(&source, "EUR", date(2024, 3, 16), 10, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(rate.effective_date, date(2024, 3, 15));
    assert_eq!(rate.value, dec!(4.32));
}

#[tokio::test]
async fn ten_missing_days_exhaust_after_exactly_ten_lookups() {
    let source = TableSource::new().publish(date(2024, 3, 1), dec!(4.3));
    let err = resolve_rate(&source, "EUR", date(2024, 3, 20), MAX_LOOKUP_ATTEMPTS, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RateError::Exhausted {
            currency: "EUR".into(),
            target_date: date(2024, 3, 20),
            attempts: 10,
        }
    );
    let calls = source.calls();
    assert_eq!(calls.len(), 10);
    assert_eq!(calls.first(), Some(&date(2024, 3, 20)));
    assert_eq!(calls.last(), Some(&date(2024, 3, 11)));
}

#[tokio::test]
async fn smaller_budget_is_honoured() {
    let source = TableSource::new();
    let err = resolve_rate(&source, "USD", date(2024, 3, 20), 3, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RateError::Exhausted { attempts: 3, .. }));
    assert_eq!(source.calls().len(), 3);
}

// ---------------------------------------------------------------------------
// Hard failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hard_failure_stops_walk() {
    let source = TableSource::new()
        .broken(date(2024, 3, 16))
        .publish(date(2024, 3, 15), dec!(4.3));
    let err = resolve_rate(&source, "EUR", date(2024, 3, 17), 10, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RateError::Source(SourceError::Http { status: 500, .. })));
    assert_eq!(source.calls(), vec![date(2024, 3, 17), date(2024, 3, 16)]);
}

#[tokio::test]
async fn hard_failure_and_exhaustion_messages_differ() {
    let hard = RateError::Source(SourceError::Network("connection refused".into()));
    let exhausted = RateError::Exhausted {
        currency: "EUR".into(),
        target_date: date(2024, 3, 20),
        attempts: 10,
    };
    assert_ne!(hard.user_message(), exhausted.user_message());
    assert!(exhausted.user_message().contains("EUR"));
}

// ---------------------------------------------------------------------------
// Effective date comes from the source
// ---------------------------------------------------------------------------

/// A source that rounds every request to a fixed earlier publication day.
struct RoundingSource;

#[async_trait]
impl RateSource for RoundingSource {
    async fn fetch_rate(&self, currency: &str, _date: NaiveDate) -> Result<RateQuote, SourceError> {
        Ok(RateQuote {
            currency: currency.to_string(),
            effective_date: date(2024, 3, 14),
            mid: dec!(4.29),
            table_no: Some("052/A/NBP/2024".into()),
        })
    }
}

#[tokio::test]
async fn reported_effective_date_wins_over_lookup_date() {
    let rate = resolve_rate(&RoundingSource, "EUR", date(2024, 3, 18), 10, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(rate.effective_date, date(2024, 3, 14));
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// NotFound for every day; cancels the token on the given call.
struct CancelOnCall {
    token: CancellationToken,
    cancel_on: u32,
    calls: Mutex<u32>,
}

#[async_trait]
impl RateSource for CancelOnCall {
    async fn fetch_rate(&self, currency: &str, date: NaiveDate) -> Result<RateQuote, SourceError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if n == self.cancel_on {
            self.token.cancel();
        }
        Err(SourceError::NotFound {
            currency: currency.to_string(),
            date,
        })
    }
}

#[tokio::test]
async fn cancelled_lookup_stops_retrying() {
    let token = CancellationToken::new();
    let source = CancelOnCall {
        token: token.clone(),
        cancel_on: 3,
        calls: Mutex::new(0),
    };
    let err = resolve_rate(&source, "EUR", date(2024, 3, 20), 10, &token)
        .await
        .unwrap_err();
    assert_eq!(err, RateError::Cancelled);
    assert_eq!(*source.calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn cancel_interrupts_request_in_flight() {
    let source = Arc::new(HangingSource::new());
    let token = CancellationToken::new();

    let task = {
        let source = Arc::clone(&source);
        let token = token.clone();
        tokio::spawn(async move {
            resolve_rate(source.as_ref(), "EUR", date(2024, 3, 20), 10, &token).await
        })
    };

    tokio::task::yield_now().await;
    token.cancel();
    let result = task.await.unwrap();
    assert_eq!(result, Err(RateError::Cancelled));
    assert!(*source.calls.lock().unwrap() <= 1);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn default_config_uses_ten_attempts() {
    assert_eq!(RateConfig::default().max_attempts, MAX_LOOKUP_ATTEMPTS);
    assert_eq!(MAX_LOOKUP_ATTEMPTS, 10);
    assert_eq!(RateConfig::default().api_url, NBP_API_URL);
}
