/*!
Local filesystem storage adapter implementation.
*/

use super::{validate_key, KeyValueStore};
use crate::{Result, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension used for every stored key
pub const FILE_EXTENSION: &str = "json";

/// Local filesystem storage adapter
///
/// Each key is stored as `<base_dir>/<key>.json`. The base directory is
/// created on the first write if it doesn't exist.
///
/// # Example
/// ```rust
/// use myfit_core::storage::{FileStore, KeyValueStore};
///
/// let dir = tempfile::tempdir()?;
/// let store = FileStore::new(dir.path());
/// store.set("myfit-workouts", "[]")?;
/// assert_eq!(store.get("myfit-workouts")?, Some("[]".to_string()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `base_dir`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the stored files
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve the file path for a key, rejecting keys that could escape the base directory
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_dir.join(format!("{key}.{FILE_EXTENSION}")))
    }

    fn ensure_base_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                StoreError::storage(format!(
                    "Failed to create directory {}: {}",
                    self.base_dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        self.ensure_base_dir()?;

        fs::write(&path, value).map_err(|e| {
            StoreError::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!(key, bytes = value.len(), "wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.path_for(key).map(|path| path.exists()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.set("myfit-workouts", "[]").is_ok());
        assert!(store.contains("myfit-workouts"));
        assert!(temp_dir.path().join("myfit-workouts.json").exists());

        assert_eq!(store.get("myfit-workouts").unwrap(), Some("[]".to_string()));

        assert!(store.remove("myfit-workouts").is_ok());
        assert!(!store.contains("myfit-workouts"));
    }

    #[test]
    fn test_file_store_creates_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested").join("data"));

        store.set("myfit-exercises", "[]").unwrap();
        assert!(store.base_dir().is_dir());
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert_eq!(store.get("myfit-progress").unwrap(), None);
        assert!(store.remove("myfit-progress").is_ok());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let result = store.set("../outside", "[]");
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
        assert!(!store.contains("../outside"));
    }
}
