use tracing::{debug, warn};

use super::Session;
use crate::models::User;
use crate::storage::{KeyValueStore, StorageError};

/// A persisted session field and its storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AccessToken,
    RefreshToken,
    AccessTokenExpiresAt,
    RefreshTokenExpiresAt,
    User,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::AccessToken,
        Field::RefreshToken,
        Field::AccessTokenExpiresAt,
        Field::RefreshTokenExpiresAt,
        Field::User,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::AccessToken => "access_token",
            Field::RefreshToken => "refresh_token",
            Field::AccessTokenExpiresAt => "access_token_expires_at",
            Field::RefreshTokenExpiresAt => "refresh_token_expires_at",
            Field::User => "user",
        }
    }
}

/// Owns the in-memory `Session` and keeps durable storage in step with it.
///
/// Every setter writes storage first and only then updates memory, so a failed
/// write leaves the in-memory field at its previous value.
pub struct SessionStore {
    storage: Box<dyn KeyValueStore>,
    session: Session,
}

impl SessionStore {
    /// Create an empty store over `storage` without reading it.
    pub fn new(storage: impl KeyValueStore + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            session: Session::default(),
        }
    }

    /// Create a store and populate it from whatever `storage` already holds.
    pub fn open(storage: impl KeyValueStore + 'static) -> Result<Self, StorageError> {
        let mut store = Self::new(storage);
        store.load()?;
        Ok(store)
    }

    /// Rebuild the session from storage. Absent keys become absent fields.
    pub fn load(&mut self) -> Result<(), StorageError> {
        let user = match self.storage.get(Field::User.key())? {
            Some(raw) => Some(
                serde_json::from_str::<User>(&raw)
                    .map_err(|e| StorageError::serialization(Field::User.key(), e))?,
            ),
            None => None,
        };

        self.session = Session {
            user,
            access_token: self.storage.get(Field::AccessToken.key())?,
            refresh_token: self.storage.get(Field::RefreshToken.key())?,
            access_token_expires_at: self.storage.get(Field::AccessTokenExpiresAt.key())?,
            refresh_token_expires_at: self.storage.get(Field::RefreshTokenExpiresAt.key())?,
        };

        debug!(
            authenticated = self.session.is_authenticated(),
            has_refresh_token = self.session.refresh_token.is_some(),
            "Loaded session from storage"
        );
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn set_access_token(&mut self, value: Option<String>) -> Result<(), StorageError> {
        self.persist(Field::AccessToken, value.as_deref())?;
        self.session.access_token = value;
        Ok(())
    }

    pub(crate) fn set_refresh_token(&mut self, value: Option<String>) -> Result<(), StorageError> {
        self.persist(Field::RefreshToken, value.as_deref())?;
        self.session.refresh_token = value;
        Ok(())
    }

    pub(crate) fn set_access_token_expires_at(&mut self, value: Option<String>) -> Result<(), StorageError> {
        self.persist(Field::AccessTokenExpiresAt, value.as_deref())?;
        self.session.access_token_expires_at = value;
        Ok(())
    }

    pub(crate) fn set_refresh_token_expires_at(&mut self, value: Option<String>) -> Result<(), StorageError> {
        self.persist(Field::RefreshTokenExpiresAt, value.as_deref())?;
        self.session.refresh_token_expires_at = value;
        Ok(())
    }

    pub(crate) fn set_user(&mut self, value: Option<User>) -> Result<(), StorageError> {
        let raw = value
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::serialization(Field::User.key(), e))?;
        self.persist(Field::User, raw.as_deref())?;
        self.session.user = value;
        Ok(())
    }

    /// Reset every field and remove every key.
    ///
    /// Memory is always cleared. Keys that could not be removed are logged and
    /// their count returned.
    pub(crate) fn clear(&mut self) -> usize {
        self.session = Session::default();

        let mut failures = 0;
        for field in Field::ALL {
            if let Err(e) = self.storage.remove(field.key()) {
                warn!(key = field.key(), error = %e, "Failed to remove session key");
                failures += 1;
            }
        }
        failures
    }

    fn persist(&self, field: Field, value: Option<&str>) -> Result<(), StorageError> {
        match value {
            Some(v) => self.storage.set(field.key(), v),
            None => self.storage.remove(field.key()),
        }
    }
}
