//! Daily reference rate lookup.
//!
//! A [`RateSource`] answers one (currency, day) question. [`resolve_rate`]
//! turns that into "the latest rate published on or before the target day",
//! walking back over non-trading days within a bounded window and stopping as
//! soon as its cancellation token fires.
//!
//! # Example
//!
//! ```ignore
//! use faktura_pl::rates::*;
//! use tokio_util::sync::CancellationToken;
//!
//! let config = RateConfig::from_env();
//! let client = NbpClient::new(&config)?;
//! let rate = resolve_rate(&client, "EUR", target, config.max_attempts, &CancellationToken::new()).await?;
//! println!("{} PLN as of {}", rate.value, rate.effective_date);
//! ```

mod config;
#[cfg(feature = "nbp")]
mod nbp;
mod resolver;
mod source;

pub use config::{NBP_API_URL, RateConfig};
#[cfg(feature = "nbp")]
pub use nbp::NbpClient;
pub use resolver::{MAX_LOOKUP_ATTEMPTS, RateError, resolve_rate};
pub use source::{RateQuote, RateSource, SourceError};
pub use tokio_util::sync::CancellationToken;
