/*!
In-memory storage adapter.
*/

use super::KeyValueStore;
use crate::{Result, StoreError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Memory-based storage adapter
///
/// Values live in a `HashMap` for the lifetime of the store. An optional
/// byte quota caps the combined size of all values; a write that would
/// exceed it fails with [`StoreError::QuotaExceeded`] and leaves the
/// previous value in place, the way a browser's local storage does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store whose values may not exceed `quota` bytes in total
    pub fn with_quota(quota: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Combined size of all stored values in bytes
    pub fn used_bytes(&self) -> Result<usize> {
        Ok(self.lock()?.values().map(String::len).sum())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| StoreError::storage("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.lock()?;

        if let Some(quota) = self.quota {
            let others: usize = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let required = others + value.len();
            if required > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }

        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.lock().map(|data| data.contains_key(key)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic_operations() {
        let store = MemoryStore::new();

        store.set("myfit-workouts", "[]").unwrap();
        assert!(store.contains("myfit-workouts"));
        assert_eq!(store.get("myfit-workouts").unwrap(), Some("[]".to_string()));
        assert_eq!(store.get("missing").unwrap(), None);

        store.remove("myfit-workouts").unwrap();
        assert!(!store.contains("myfit-workouts"));
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "12345").unwrap();

        let result = store.set("b", "123456");
        assert!(matches!(
            result,
            Err(StoreError::QuotaExceeded { required: 11, quota: 10, .. })
        ));
        assert!(!store.contains("b"));
        assert_eq!(store.used_bytes().unwrap(), 5);
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let store = MemoryStore::with_quota(10);
        store.set("a", "1234567890").unwrap();

        // Overwriting frees the old value first
        store.set("a", "0987654321").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("0987654321".to_string()));
    }
}
