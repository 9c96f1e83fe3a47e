//! # faktura-pl
//!
//! Engine of a Polish VAT invoice editor: the invoice data model, VAT totals,
//! conversion to PLN at the NBP reference rate, an address book of parties
//! and a print-ready view model.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Dates are calendar dates ([`chrono::NaiveDate`]) in UTC.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use faktura_pl::core::*;
//! use rust_decimal_macros::dec;
//!
//! let invoice = InvoiceBuilder::new("FV/1/06/2024")
//!     .issue_date(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap())
//!     .seller(CompanyBuilder::new("ACME Sp. z o.o.")
//!         .address("ul. Prosta 1", "00-001", "Warszawa")
//!         .tax_id("5260250274")
//!         .build())
//!     .buyer(CompanyBuilder::new("Klient S.A.").build())
//!     .add_item(ItemBuilder::new("Konsultacje", dec!(2), "godz.", dec!(100))
//!         .vat(VatRate::STANDARD))
//!     .build()
//!     .unwrap();
//!
//! let totals = calculate(&invoice.items);
//! assert_eq!(totals.gross_total, dec!(246));
//! assert!(validate_invoice(&invoice).is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Invoice types, VAT calculator, business days, numbering, validation |
//! | `rates` | Rate source trait, cancellable rate resolution, invoice controller |
//! | `nbp` | NBP table A HTTP client |
//! | `addressbook` | Name-keyed address book, storage trait, JSON import/export |
//! | `preview` | Formatted print view model |
//! | `all` | Everything |
//!
//! All features are enabled by default.

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "rates")]
pub mod rates;

#[cfg(feature = "rates")]
pub mod controller;

#[cfg(feature = "addressbook")]
pub mod addressbook;

#[cfg(feature = "preview")]
pub mod preview;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
