//! File-backed storage slot.
//!
//! All keys live in one JSON object file:
//!
//! ```json
//! {"@RocketShoes:cart": "[{\"id\":1,...,\"amount\":2}]"}
//! ```
//!
//! Writes go to a sibling temp file which is then renamed over the original,
//! so a crash mid-write leaves the previous snapshot intact. A write that
//! would exceed the size cap is refused before touching the file; a file
//! that cannot be read is replaced by the next write.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::{StorageError, StorageSlot};

/// Maximum storage file size (1MB).
const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Storage slot persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// The file and its parent directories are created on the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn too_large(&self, size: u64) -> StorageError {
        StorageError::TooLarge {
            path: self.path.clone(),
            size,
            limit: MAX_FILE_SIZE,
        }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if metadata.len() > MAX_FILE_SIZE {
            return Err(self.too_large(metadata.len()));
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_string_pretty(values).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let size = u64::try_from(contents.len()).unwrap_or(u64::MAX);
        if size > MAX_FILE_SIZE {
            return Err(self.too_large(size));
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "Storage file written");
        Ok(())
    }
}

impl StorageSlot for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(e @ (StorageError::Corrupt { .. } | StorageError::TooLarge { .. })) => {
                warn!(error = %e, "Unreadable storage file, overwriting");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        assert_eq!(storage.get("@RocketShoes:cart").unwrap(), None);
    }

    #[test]
    fn test_set_creates_parent_dirs_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        FileStorage::new(&path).set("@RocketShoes:cart", "[]").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get("@RocketShoes:cart").unwrap().as_deref(),
            Some("[]")
        );
        assert!(!dir.path().join("nested").join("storage.json.tmp").exists());
    }

    #[test]
    fn test_set_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));

        storage.set("theme", "dark").unwrap();
        storage.set("@RocketShoes:cart", "[]").unwrap();

        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileStorage::new(&path).get("@RocketShoes:cart").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_set_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();
        let storage = FileStorage::new(&path);

        storage.set("@RocketShoes:cart", "[]").unwrap();

        assert_eq!(
            storage.get("@RocketShoes:cart").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_oversized_value_is_refused_and_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let storage = FileStorage::new(&path);
        storage.set("@RocketShoes:cart", "[]").unwrap();

        let huge = "x".repeat(1_100_000);
        let err = storage.set("@RocketShoes:cart", &huge).unwrap_err();

        assert!(matches!(err, StorageError::TooLarge { .. }));
        assert_eq!(
            storage.get("@RocketShoes:cart").unwrap().as_deref(),
            Some("[]")
        );
        storage.set("theme", "dark").unwrap();
        assert!(!dir.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_set_replaces_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, " ".repeat(1_100_000)).unwrap();
        let storage = FileStorage::new(&path);

        assert!(matches!(
            storage.get("@RocketShoes:cart").unwrap_err(),
            StorageError::TooLarge { .. }
        ));
        storage.set("@RocketShoes:cart", "[]").unwrap();
        assert_eq!(
            storage.get("@RocketShoes:cart").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_empty_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "  \n").unwrap();

        assert_eq!(FileStorage::new(&path).get("anything").unwrap(), None);
    }
}
