/// JSON file storage backend.
///
/// Keeps every key in one JSON object on disk with:
/// - Load once on open, write-through on every mutation
/// - Atomic writes (write to .tmp, fsync, rename)
/// - A store file that cannot be read or parsed is never overwritten;
///   every operation reports `Unavailable` instead

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    /// Set when the existing file could not be loaded.
    broken: Option<String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (entries, broken) = match Self::load(&path) {
            Ok(entries) => (entries, None),
            Err(e) => {
                log::warn!(
                    "[kaybee.storage.file] Cannot load store {:?}: {}",
                    path,
                    e
                );
                (BTreeMap::new(), Some(e.to_string()))
            }
        };
        Self {
            path,
            entries,
            broken,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        match &self.broken {
            Some(reason) => Err(StorageError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn flush(&self) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        Self::atomic_write(&self.path, &content)?;
        Ok(())
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp_path = path.with_extension("kaybee.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            // Keep memory in step with disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        if let Some(old) = self.entries.remove(key) {
            if let Err(e) = self.flush() {
                self.entries.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path);
        store.set("kaybee-theme", "dark").unwrap();
        store.set("kaybee-font", "readable").unwrap();
        store.remove("kaybee-font").unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("kaybee-theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get("kaybee-font").unwrap(), None);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");

        let mut store = JsonFileStore::open(&path);
        store.set("k", "v").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("kaybee.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_unavailable_and_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = JsonFileStore::open(&path);
        assert!(matches!(store.get("k"), Err(StorageError::Unavailable(_))));
        assert!(store.set("k", "v").is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_failed_write_rolls_back_memory() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should go makes the rename fail
        let path = dir.path().join("store.json");
        fs::create_dir_all(path.join("occupied")).unwrap();

        let mut blocked = JsonFileStore {
            path,
            entries: BTreeMap::new(),
            broken: None,
        };
        assert!(blocked.set("a", "1").is_err());
        assert_eq!(blocked.get("a").unwrap(), None);
    }
}
