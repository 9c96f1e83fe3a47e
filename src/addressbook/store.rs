use std::collections::HashMap;

use super::AddressBookError;

/// String key-value storage, the shape of browser local storage.
pub trait KeyValueStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// `AddressBookError::Storage` when the backend refuses the write
    /// (e.g. quota exceeded).
    fn set(&mut self, key: &str, value: String) -> Result<(), AddressBookError>;

    /// Delete a value. Missing keys are ignored.
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    /// Maximum total size of stored values in bytes, if limited.
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once the stored values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), AddressBookError> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                return Err(AddressBookError::Storage(format!(
                    "quota of {quota} bytes exceeded"
                )));
            }
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        store.set("a", "1".into()).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.remove("a");
        assert!(store.get("a").is_none());
        store.remove("a");
        assert!(store.is_empty());
    }

    #[test]
    fn quota_counts_replacement_once() {
        let mut store = MemoryStore::with_quota(4);
        store.set("a", "1234".into()).unwrap();
        store.set("a", "abcd".into()).unwrap();
        assert!(store.set("b", "x".into()).is_err());
        assert_eq!(store.len(), 1);
    }
}
