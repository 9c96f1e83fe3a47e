//! NBP (Narodowy Bank Polski) table A client.
//!
//! `GET {api}/exchangerates/rates/a/{code}/{YYYY-MM-DD}/?format=json` returns
//! the mid rate published on that day, or HTTP 404 when no table was
//! published (weekends, public holidays).

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::config::RateConfig;
use super::source::{RateQuote, RateSource, SourceError};

/// Table A rates response.
#[derive(Debug, Deserialize)]
struct NbpRatesResponse {
    code: String,
    rates: Vec<NbpRate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NbpRate {
    no: Option<String>,
    effective_date: String,
    mid: serde_json::Number,
}

/// HTTP client for the NBP exchange-rate API.
#[derive(Debug, Clone)]
pub struct NbpClient {
    client: reqwest::Client,
    api_url: String,
}

impl NbpClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Network` if the HTTP client cannot be created.
    pub fn new(config: &RateConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the table A rate for one currency and day.
    pub fn rate_url(&self, currency: &str, date: NaiveDate) -> String {
        format!(
            "{}/exchangerates/rates/a/{}/{}/?format=json",
            self.api_url,
            currency.to_lowercase(),
            date.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl RateSource for NbpClient {
    async fn fetch_rate(&self, currency: &str, date: NaiveDate) -> Result<RateQuote, SourceError> {
        let url = self.rate_url(currency, date);
        debug!(%url, "GET NBP rate");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                currency: currency.to_string(),
                date,
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_rate_response(currency, &body)
    }
}

/// Parse a table A single-rate response body.
pub(crate) fn parse_rate_response(currency: &str, body: &str) -> Result<RateQuote, SourceError> {
    let resp: NbpRatesResponse = serde_json::from_str(body)
        .map_err(|e: serde_json::Error| SourceError::Parse(e.to_string()))?;

    if !resp.code.eq_ignore_ascii_case(currency) {
        return Err(SourceError::Parse(format!(
            "asked for {currency}, got {}",
            resp.code
        )));
    }

    let rate = resp
        .rates
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Parse("response contains no rates".into()))?;

    let effective_date = NaiveDate::parse_from_str(&rate.effective_date, "%Y-%m-%d")
        .map_err(|e| SourceError::Parse(format!("effectiveDate '{}': {e}", rate.effective_date)))?;

    let raw = rate.mid.to_string();
    let mid = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| SourceError::Parse(format!("mid '{raw}': {e}")))?;
    if mid <= Decimal::ZERO {
        return Err(SourceError::Parse(format!("mid '{raw}' is not positive")));
    }

    Ok(RateQuote {
        currency: resp.code.to_uppercase(),
        effective_date,
        mid,
        table_no: rate.no,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EUR_BODY: &str = r#"{"table":"A","currency":"euro","code":"EUR","rates":[{"no":"052/A/NBP/2024","effectiveDate":"2024-03-15","mid":4.3213}]}"#;

    #[test]
    fn url_is_https_and_lowercase() {
        let client = NbpClient::new(&RateConfig::default()).unwrap();
        let url = client.rate_url("EUR", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(
            url,
            "https://api.nbp.pl/api/exchangerates/rates/a/eur/2024-03-15/?format=json"
        );
    }

    #[test]
    fn parses_exact_mid() {
        let quote = parse_rate_response("EUR", EUR_BODY).unwrap();
        assert_eq!(quote.mid, dec!(4.3213));
        assert_eq!(quote.effective_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(quote.table_no.as_deref(), Some("052/A/NBP/2024"));
    }

    #[test]
    fn currency_mismatch_rejected() {
        assert!(matches!(
            parse_rate_response("USD", EUR_BODY),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn empty_rates_rejected() {
        let body = r#"{"table":"A","currency":"euro","code":"EUR","rates":[]}"#;
        assert!(parse_rate_response("EUR", body).is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(matches!(
            parse_rate_response("EUR", "404 NotFound - Not Found - Brak danych"),
            Err(SourceError::Parse(_))
        ));
    }
}
