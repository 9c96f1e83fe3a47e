//! Print preview.
//!
//! [`InvoiceView`] is the fully formatted view of an invoice: every amount,
//! date and label is already a string. Rendering it to HTML/PDF and calling
//! the platform print dialog happens outside this crate.

mod format;
mod view;

pub use format::{format_amount, format_date, format_quantity, format_rate, parse_amount};
pub use view::{AmountsView, BreakdownRow, ConversionView, InvoiceView, ItemView, PartyView};
