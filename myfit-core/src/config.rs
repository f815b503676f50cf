//! Configuration module for storage backend selection and settings
//!
//! This module provides configuration structures and enums for selecting
//! between the storage backends (local files or process memory) and opening a
//! [`FitnessStore`] over the selected one.

use crate::storage::{DynStore, FileStore, MemoryStore};
use crate::{FitnessStore, StoreError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "MYFIT_DATA_DIR";

/// Data directory used when none is configured
pub const DEFAULT_DATA_DIR: &str = "./myfit-data";

/// URI selecting the in-memory backend
pub const MEMORY_URI: &str = "memory://";

/// Enumeration of supported storage backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    /// One JSON file per collection in a local directory
    File,
    /// Process memory; nothing survives the process
    Memory,
}

/// Configuration structure for storage backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// The storage backend to use
    pub backend: StoreBackend,
    /// Directory for the file backend (defaults to [`DEFAULT_DATA_DIR`])
    pub data_dir: Option<PathBuf>,
    /// Byte quota for the memory backend (unbounded when absent)
    pub memory_quota: Option<usize>,
}

impl StoreConfig {
    /// Create a default configuration for file storage
    pub fn default_file() -> Self {
        StoreConfig {
            backend: StoreBackend::File,
            data_dir: None,
            memory_quota: None,
        }
    }

    /// Create a file configuration rooted at the given directory
    pub fn file_in<P: Into<PathBuf>>(data_dir: P) -> Self {
        StoreConfig {
            backend: StoreBackend::File,
            data_dir: Some(data_dir.into()),
            memory_quota: None,
        }
    }

    /// Create an in-memory configuration
    pub fn in_memory() -> Self {
        StoreConfig {
            backend: StoreBackend::Memory,
            data_dir: None,
            memory_quota: None,
        }
    }

    /// Create a file configuration from `MYFIT_DATA_DIR`, falling back to the default directory
    pub fn from_env() -> Self {
        match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => Self::file_in(dir),
            _ => Self::default_file(),
        }
    }

    /// Parse a storage URI and create appropriate configuration
    ///
    /// Supports formats:
    /// - `memory://` for the in-memory backend
    /// - `/local/path` or `./relative/path` for the file backend
    pub fn from_uri(uri: &str) -> Result<StoreConfig, StoreError> {
        if uri == MEMORY_URI {
            return Ok(StoreConfig::in_memory());
        }
        if let Some((scheme, _)) = uri.split_once("://") {
            return Err(StoreError::validation(format!(
                "Unsupported storage scheme: {scheme}"
            )));
        }
        if uri.trim().is_empty() {
            return Err(StoreError::validation("Storage path cannot be empty"));
        }
        Ok(StoreConfig::file_in(uri))
    }

    /// Directory the file backend writes to
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        match self.backend {
            StoreBackend::File => {
                if self.memory_quota.is_some() {
                    return Err(StoreError::validation(
                        "memory_quota only applies to the memory backend",
                    ));
                }
                let dir = self.resolved_data_dir();
                if dir.as_os_str().is_empty() {
                    return Err(StoreError::validation("File backend requires a data directory"));
                }
                if dir.is_file() {
                    return Err(StoreError::validation(format!(
                        "Data directory {} is a file",
                        dir.display()
                    )));
                }
            }
            StoreBackend::Memory => {
                if self.memory_quota == Some(0) {
                    return Err(StoreError::validation("memory_quota must be positive"));
                }
            }
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::default_file()
    }
}

/// Open a fitness store over the backend selected by `config`
///
/// # Example
/// ```rust
/// use myfit_core::{open_store, EntityRepository, StoreConfig};
///
/// let store = open_store(&StoreConfig::in_memory())?;
/// assert!(store.workouts().get_all().is_empty());
/// # Ok::<(), myfit_core::StoreError>(())
/// ```
pub fn open_store(config: &StoreConfig) -> crate::Result<FitnessStore<DynStore>> {
    config.validate()?;

    let backend: DynStore = match config.backend {
        StoreBackend::File => Box::new(FileStore::new(config.resolved_data_dir())),
        StoreBackend::Memory => match config.memory_quota {
            Some(quota) => Box::new(MemoryStore::with_quota(quota)),
            None => Box::new(MemoryStore::new()),
        },
    };

    tracing::debug!(backend = ?config.backend, "opened store");
    Ok(FitnessStore::new(backend))
}
