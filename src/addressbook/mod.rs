//! Address book of sellers and buyers.
//!
//! Companies are keyed by name: saving a record under an existing name
//! replaces it. The book persists to a [`KeyValueStore`] and can be exported
//! to and imported from a JSON file of the form
//!
//! ```json
//! { "seller": { "ACME": { "name": "ACME", ... } }, "buyer": { ... } }
//! ```
//!
//! Imports are all-or-nothing: a file that fails to parse or validate leaves
//! the book untouched.

mod store;

pub use store::{KeyValueStore, MemoryStore};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::CompanyInfo;

/// Errors from the address book and its storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AddressBookError {
    /// The document is not valid JSON of the expected shape.
    #[error("could not read address book file: {0}")]
    Parse(String),

    /// A record is structurally valid but inconsistent.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// A company without a name cannot be stored.
    #[error("company name must not be empty")]
    EmptyName,

    /// The backing store refused a write.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Which side of the invoice a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Seller,
    Buyer,
}

/// Result of [`AddressBook::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Name-keyed sellers and buyers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressBook {
    #[serde(default)]
    seller: BTreeMap<String, CompanyInfo>,
    #[serde(default)]
    buyer: BTreeMap<String, CompanyInfo>,
}

impl AddressBook {
    /// Key under which the book is persisted.
    pub const STORAGE_KEY: &'static str = "addressBook";

    pub fn new() -> Self {
        Self::default()
    }

    /// Read the book from storage. A missing entry yields an empty book.
    ///
    /// # Errors
    ///
    /// `AddressBookError::Parse` if the stored document is corrupt.
    pub fn load(store: &impl KeyValueStore) -> Result<Self, AddressBookError> {
        match store.get(Self::STORAGE_KEY) {
            Some(text) => {
                let book = Self::parse_json(&text)?;
                debug!(
                    sellers = book.seller.len(),
                    buyers = book.buyer.len(),
                    "Address book loaded"
                );
                Ok(book)
            }
            None => Ok(Self::new()),
        }
    }

    /// Write the book to storage.
    pub fn persist(&self, store: &mut impl KeyValueStore) -> Result<(), AddressBookError> {
        let text = serde_json::to_string(self).map_err(|e| AddressBookError::Storage(e.to_string()))?;
        store.set(Self::STORAGE_KEY, text)
    }

    fn entries(&self, role: PartyRole) -> &BTreeMap<String, CompanyInfo> {
        match role {
            PartyRole::Seller => &self.seller,
            PartyRole::Buyer => &self.buyer,
        }
    }

    fn entries_mut(&mut self, role: PartyRole) -> &mut BTreeMap<String, CompanyInfo> {
        match role {
            PartyRole::Seller => &mut self.seller,
            PartyRole::Buyer => &mut self.buyer,
        }
    }

    /// Stored names, sorted.
    pub fn names(&self, role: PartyRole) -> Vec<&str> {
        self.entries(role).keys().map(String::as_str).collect()
    }

    pub fn get(&self, role: PartyRole, name: &str) -> Option<&CompanyInfo> {
        self.entries(role).get(name.trim())
    }

    pub fn len(&self, role: PartyRole) -> usize {
        self.entries(role).len()
    }

    pub fn is_empty(&self) -> bool {
        self.seller.is_empty() && self.buyer.is_empty()
    }

    /// Store a company under its (trimmed) name, replacing a record with the
    /// same name.
    pub fn save(
        &mut self,
        role: PartyRole,
        mut company: CompanyInfo,
    ) -> Result<SaveOutcome, AddressBookError> {
        let name = company.name.trim().to_string();
        if name.is_empty() {
            return Err(AddressBookError::EmptyName);
        }
        company.name = name.clone();
        let outcome = match self.entries_mut(role).insert(name.clone(), company) {
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Inserted,
        };
        debug!(?role, %name, ?outcome, "Company saved");
        Ok(outcome)
    }

    pub fn remove(&mut self, role: PartyRole, name: &str) -> Option<CompanyInfo> {
        self.entries_mut(role).remove(name.trim())
    }

    /// Pretty-printed JSON document for download.
    pub fn export_json(&self) -> Result<String, AddressBookError> {
        serde_json::to_string_pretty(self).map_err(|e| AddressBookError::Storage(e.to_string()))
    }

    /// Parse and validate an address book document.
    ///
    /// Keys and names are trimmed, so every record is reachable through
    /// [`get`](Self::get). Records with an empty `name` take the name from
    /// their key; a record whose name differs from its key, or two keys that
    /// trim to the same name, are rejected.
    pub fn parse_json(text: &str) -> Result<Self, AddressBookError> {
        let raw: Self =
            serde_json::from_str(text).map_err(|e| AddressBookError::Parse(e.to_string()))?;
        Ok(Self {
            seller: normalize_entries(PartyRole::Seller, raw.seller)?,
            buyer: normalize_entries(PartyRole::Buyer, raw.buyer)?,
        })
    }

    /// Replace the whole book with an imported document.
    ///
    /// On error the current contents are kept.
    pub fn import_json(&mut self, text: &str) -> Result<(), AddressBookError> {
        match Self::parse_json(text) {
            Ok(book) => {
                info!(
                    sellers = book.seller.len(),
                    buyers = book.buyer.len(),
                    "Address book imported"
                );
                *self = book;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Address book import rejected");
                Err(e)
            }
        }
    }
}

fn normalize_entries(
    role: PartyRole,
    entries: BTreeMap<String, CompanyInfo>,
) -> Result<BTreeMap<String, CompanyInfo>, AddressBookError> {
    let mut normalized = BTreeMap::new();
    for (key, mut record) in entries {
        let name = key.trim();
        if name.is_empty() {
            return Err(AddressBookError::InvalidRecord(format!(
                "{role:?} entry with an empty key"
            )));
        }
        if !record.name.trim().is_empty() && record.name.trim() != name {
            return Err(AddressBookError::InvalidRecord(format!(
                "{role:?} entry '{key}' holds company '{}'",
                record.name
            )));
        }
        record.name = name.to_string();
        if normalized.insert(name.to_string(), record).is_some() {
            return Err(AddressBookError::InvalidRecord(format!(
                "{role:?} entry '{name}' appears more than once"
            )));
        }
    }
    Ok(normalized)
}

/// Serialize a single company for download.
pub fn export_company(company: &CompanyInfo) -> Result<String, AddressBookError> {
    serde_json::to_string_pretty(company).map_err(|e| AddressBookError::Storage(e.to_string()))
}

/// Parse a single exported company.
pub fn import_company(text: &str) -> Result<CompanyInfo, AddressBookError> {
    let company: CompanyInfo =
        serde_json::from_str(text).map_err(|e| AddressBookError::Parse(e.to_string()))?;
    if company.name.trim().is_empty() {
        return Err(AddressBookError::EmptyName);
    }
    Ok(company)
}
