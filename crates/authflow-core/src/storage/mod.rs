//! Durable key-value storage for session fields.
//!
//! Each session field lives under its own key. A missing key means the field
//! is absent. Backends:
//! - `FileStore`: one file per key in a directory
//! - `KeyringStore`: one OS keychain entry per key
//! - `MemoryStore`: in-process map, nothing survives a restart

pub mod error;
pub mod file;
pub mod keychain;
pub mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use keychain::KeyringStore;
pub use memory::MemoryStore;

/// Flat string key-value surface backing a `SessionStore`.
pub trait KeyValueStore: Send + Sync {
    /// Read a key, returning `None` when it has never been written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
