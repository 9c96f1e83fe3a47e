//! Invoice data model, VAT arithmetic and date helpers.
//!
//! Nothing in this module performs I/O. Monetary values are
//! [`rust_decimal::Decimal`] throughout.

mod builder;
mod calc;
pub mod currencies;
pub mod dates;
mod error;
mod logo;
mod numbering;
mod types;
mod validation;

pub use builder::*;
pub use calc::*;
pub use currencies::{DOMESTIC_CURRENCY, is_known_currency_code};
pub use error::*;
pub use logo::*;
pub use numbering::*;
pub use types::*;
pub use validation::*;
