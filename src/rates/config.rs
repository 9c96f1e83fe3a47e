//! Rate lookup configuration.
//!
//! Defaults suit the public NBP API. Each value can be overridden through the
//! environment:
//!
//! | Variable | Field |
//! |---|---|
//! | `FAKTURA_NBP_URL` | `api_url` |
//! | `FAKTURA_RATE_TIMEOUT_SECS` | `timeout_secs` |
//! | `FAKTURA_RATE_MAX_ATTEMPTS` | `max_attempts` |

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::resolver::MAX_LOOKUP_ATTEMPTS;

/// Base URL of the NBP web API.
pub const NBP_API_URL: &str = "https://api.nbp.pl/api";

/// Settings shared by the rate client and the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// API base URL, without trailing slash.
    pub api_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Days looked up before giving up (one request per day).
    pub max_attempts: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            api_url: NBP_API_URL.to_string(),
            timeout_secs: 10,
            max_attempts: MAX_LOOKUP_ATTEMPTS,
        }
    }
}

impl RateConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable or out-of-range values are logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("FAKTURA_NBP_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.starts_with("http://") || url.starts_with("https://") {
                debug!(api_url = %url, "Rate API URL overridden");
                self.api_url = url.to_string();
            } else {
                warn!(value = %url, "Ignoring FAKTURA_NBP_URL: not an http(s) URL");
            }
        }

        if let Some(raw) = lookup("FAKTURA_RATE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid FAKTURA_RATE_TIMEOUT_SECS"),
            }
        }

        if let Some(raw) = lookup("FAKTURA_RATE_MAX_ATTEMPTS") {
            match raw.trim().parse::<u32>() {
                Ok(n) if (1..=31).contains(&n) => self.max_attempts = n,
                _ => warn!(value = %raw, "Ignoring invalid FAKTURA_RATE_MAX_ATTEMPTS (1-31)"),
            }
        }

        self
    }
}
