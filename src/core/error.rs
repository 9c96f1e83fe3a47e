use thiserror::Error;

/// Failure to build or edit an invoice draft.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The draft cannot be built from the given parts.
    #[error("cannot build invoice: {0}")]
    Builder(String),

    /// The number sequence cannot move to the requested period.
    #[error("invoice numbering: {0}")]
    Numbering(String),

    /// Currency code not offered by the rate source.
    #[error("unknown currency code '{0}'")]
    UnknownCurrency(String),

    /// Attempt to remove the only remaining line item.
    #[error("an invoice must keep at least one item")]
    LastItem,

    /// No line item with the given id.
    #[error("no item with id {0}")]
    UnknownItem(u64),

    /// Logo image rejected.
    #[error("logo error: {0}")]
    Logo(String),
}

/// One problem found by [`validate_invoice`](super::validate_invoice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path of the offending field, e.g. "seller.tax_id" or "items[2].quantity".
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
