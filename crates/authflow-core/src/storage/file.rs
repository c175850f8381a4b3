use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Stores each key as a plain file named after the key inside `dir`.
///
/// Writes go to a temporary file in the same directory that is then renamed
/// over the key file, so a reader sees either the old value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self, StorageError> {
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::io("<dir>", e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::io(key, e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StorageError::io(key, e))?;
        tmp.persist(self.key_path(key))
            .map_err(|e| StorageError::io(key, e.error))?;
        debug!(key = key, "Wrote session key");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => {
                debug!(key = key, "Removed session key");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().join("session")).expect("Failed to create store");

        assert_eq!(store.get("access_token").unwrap(), None);

        store.set("access_token", "abc").unwrap();
        assert_eq!(store.get("access_token").unwrap().as_deref(), Some("abc"));
        assert!(dir.path().join("session").join("access_token").exists());

        store.remove("access_token").unwrap();
        assert_eq!(store.get("access_token").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().to_path_buf()).expect("Failed to create store");
        assert!(store.remove("refresh_token").is_ok());
        assert!(store.remove("refresh_token").is_ok());
    }

    #[test]
    fn test_set_leaves_only_key_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().to_path_buf()).expect("Failed to create store");
        store.set("user", "{}").unwrap();
        store.set("user", "{\"id\":\"1\"}").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["user".to_string()]);
        assert_eq!(store.get("user").unwrap().as_deref(), Some("{\"id\":\"1\"}"));
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = FileStore::new(dir.path().to_path_buf()).expect("Failed to create store");
        store.set("user", "first").unwrap();
        store.set("user", "second").unwrap();
        assert_eq!(store.get("user").unwrap().as_deref(), Some("second"));
    }
}
