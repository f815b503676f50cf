/*!
JSON persistence of whole collections on top of a key-value store.

Reads never fail: a missing key, an unreadable backend, or a value that is not
valid JSON for the requested type all produce the caller's default. Writes
report a [`PersistOutcome`] instead of an error, leaving it to the caller to
decide whether a failed write deserves a warning.
*/

use crate::storage::KeyValueStore;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[cfg(feature = "metrics")]
use crate::observability::StoreMetrics;

/// Result of writing a collection to the store
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The value was written to the store
    Persisted,
    /// The value could not be serialized or the store rejected the write
    PersistFailed(String),
}

impl PersistOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, PersistOutcome::Persisted)
    }

    /// Failure reason, if the write failed
    pub fn failure(&self) -> Option<&str> {
        match self {
            PersistOutcome::Persisted => None,
            PersistOutcome::PersistFailed(reason) => Some(reason),
        }
    }

    /// Keep the first failure of two outcomes
    pub fn and(self, other: PersistOutcome) -> PersistOutcome {
        match self {
            PersistOutcome::Persisted => other,
            failed => failed,
        }
    }
}

impl fmt::Display for PersistOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistOutcome::Persisted => f.write_str("persisted"),
            PersistOutcome::PersistFailed(reason) => write!(f, "persist failed: {reason}"),
        }
    }
}

/// Typed JSON access to a key-value store
#[derive(Debug, Clone)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying key-value store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the value stored under `key`, or `default` if it is absent or unreadable
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        #[cfg(feature = "metrics")]
        StoreMetrics::global().record_read();

        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "no stored value, using default");
                return default;
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value, using default");
                #[cfg(feature = "metrics")]
                StoreMetrics::global().record_read_fallback();
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored value is not valid JSON, using default");
                #[cfg(feature = "metrics")]
                StoreMetrics::global().record_read_fallback();
                default
            }
        }
    }

    /// Serialize `value` and write it under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PersistOutcome {
        #[cfg(feature = "metrics")]
        StoreMetrics::global().record_write();

        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => return self.failed(key, format!("Failed to serialize value: {e}")),
        };

        match self.store.set(key, &json) {
            Ok(()) => {
                debug!(key, bytes = json.len(), "persisted collection");
                #[cfg(feature = "metrics")]
                StoreMetrics::global().record_collection_size(json.len());
                PersistOutcome::Persisted
            }
            Err(e) => self.failed(key, e.to_string()),
        }
    }

    fn failed(&self, key: &str, reason: String) -> PersistOutcome {
        warn!(key, reason = %reason, "failed to persist value");
        #[cfg(feature = "metrics")]
        StoreMetrics::global().record_write_failure();
        PersistOutcome::PersistFailed(reason)
    }
}
