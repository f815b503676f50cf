/*!
Key-value storage for persisted collections.

This module defines the storage abstraction (port) and concrete implementations
(adapters). Everything above it works with raw string values under string keys,
so the same repositories run against the filesystem in production and an
in-memory map in tests.
*/

pub mod local;
pub mod memory;

use crate::Result;
use std::sync::Arc;

pub use local::FileStore;
pub use memory::MemoryStore;

/// Storage abstraction for named string values
///
/// Implementations are synchronous: every call completes before returning.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// `Ok(None)` if nothing is stored under the key, the value otherwise
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`; removing a missing key succeeds
    fn remove(&self, key: &str) -> Result<()>;

    /// Check if a value is stored under `key`
    fn contains(&self, key: &str) -> bool;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

/// Type-erased store, as produced from configuration
pub type DynStore = Box<dyn KeyValueStore + Send + Sync>;

/// Check that a key is non-empty and limited to `[A-Za-z0-9._-]`
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(crate::StoreError::InvalidKey(key.to_string()))
    }
}
