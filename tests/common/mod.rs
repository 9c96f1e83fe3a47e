#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use faktura_pl::rates::{RateQuote, RateSource, SourceError};
use rust_decimal::Decimal;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Rate source backed by a table of published days.
///
/// Unknown days answer NotFound, days in `broken` fail hard, and days in
/// `slow` take `delay` before answering.
#[derive(Default)]
pub struct TableSource {
    published: HashMap<NaiveDate, Decimal>,
    broken: HashSet<NaiveDate>,
    slow: HashSet<NaiveDate>,
    delay: Duration,
    calls: Mutex<Vec<NaiveDate>>,
}

impl TableSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(mut self, day: NaiveDate, mid: Decimal) -> Self {
        self.published.insert(day, mid);
        self
    }

    pub fn broken(mut self, day: NaiveDate) -> Self {
        self.broken.insert(day);
        self
    }

    pub fn slow(mut self, day: NaiveDate, delay: Duration) -> Self {
        self.slow.insert(day);
        self.delay = delay;
        self
    }

    /// Days requested so far, in order.
    pub fn calls(&self) -> Vec<NaiveDate> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateSource for TableSource {
    async fn fetch_rate(&self, currency: &str, date: NaiveDate) -> Result<RateQuote, SourceError> {
        self.calls.lock().unwrap().push(date);
        if self.slow.contains(&date) {
            tokio::time::sleep(self.delay).await;
        }
        if self.broken.contains(&date) {
            return Err(SourceError::Http {
                status: 500,
                body: "Internal Server Error".into(),
            });
        }
        match self.published.get(&date) {
            Some(mid) => Ok(RateQuote {
                currency: currency.to_string(),
                effective_date: date,
                mid: *mid,
                table_no: None,
            }),
            None => Err(SourceError::NotFound {
                currency: currency.to_string(),
                date,
            }),
        }
    }
}

/// Never answers.
pub struct HangingSource {
    pub calls: Mutex<u32>,
}

impl HangingSource {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl RateSource for HangingSource {
    async fn fetch_rate(&self, _currency: &str, _date: NaiveDate) -> Result<RateQuote, SourceError> {
        *self.calls.lock().unwrap() += 1;
        std::future::pending().await
    }
}
