use serde::{Deserialize, Serialize};

/// Where the exchange-rate state of an invoice stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RateStatus {
    /// PLN invoice; no exchange-rate state exists.
    Domestic,
    /// Foreign currency, but no target date to price against.
    ForeignNoDate,
    /// A lookup for the current (currency, target date) is running.
    Pending { generation: u64 },
    /// A rate was found and is stored on the invoice.
    Resolved,
    /// The last lookup failed; `message` is shown to the user.
    Failed { message: String },
}

impl RateStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// The user-facing error, if the last lookup failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}
