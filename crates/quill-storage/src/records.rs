//! High-level API for the persisted authentication record.

use crate::{SessionStorage, StorageError, StorageKeys, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Owner of the persisted `token`/`user` record pair.
///
/// The pair is written as one logical transaction (two sequential
/// writes); absence of either key means "no persisted session".
pub struct CredentialStore {
    storage: Box<dyn SessionStorage>,
}

impl CredentialStore {
    /// Create a new credential store over the given storage backend.
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Retrieve the persisted bearer token.
    pub fn token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::TOKEN)
    }

    /// Retrieve the persisted user, deserialized.
    pub fn user<T: DeserializeOwned>(&self) -> StorageResult<Option<T>> {
        match self.storage.get(StorageKeys::USER)? {
            Some(json) => {
                let user: T = serde_json::from_str(&json)
                    .map_err(|e| StorageError::Encoding(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Persist the complete session record (token + user).
    pub fn set_session<T: Serialize>(&self, token: &str, user: &T) -> StorageResult<()> {
        let json = serde_json::to_string(user)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::TOKEN, token)?;
        self.storage.set(StorageKeys::USER, &json)?;
        Ok(())
    }

    /// Check whether a complete persisted session exists.
    pub fn has_session(&self) -> StorageResult<bool> {
        let has_token = self.storage.has(StorageKeys::TOKEN)?;
        let has_user = self.storage.has(StorageKeys::USER)?;
        Ok(has_token && has_user)
    }

    /// Clear the persisted session. Individual delete failures are
    /// ignored so logout always completes.
    pub fn clear_session(&self) -> StorageResult<()> {
        let _ = self.storage.delete(StorageKeys::TOKEN);
        let _ = self.storage.delete(StorageKeys::USER);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestUser {
        id: String,
        name: String,
    }

    fn test_user() -> TestUser {
        TestUser {
            id: "user-1".to_string(),
            name: "Ada".to_string(),
        }
    }

    #[test]
    fn test_set_session_writes_both_keys() {
        let store = CredentialStore::new(Box::new(MemoryStorage::new()));

        store.set_session("tok-1", &test_user()).unwrap();

        assert_eq!(store.token().unwrap(), Some("tok-1".to_string()));
        assert_eq!(store.user::<TestUser>().unwrap(), Some(test_user()));
        assert!(store.has_session().unwrap());
    }

    #[test]
    fn test_no_session_initially() {
        let store = CredentialStore::new(Box::new(MemoryStorage::new()));

        assert_eq!(store.token().unwrap(), None);
        assert_eq!(store.user::<TestUser>().unwrap(), None);
        assert!(!store.has_session().unwrap());
    }

    #[test]
    fn test_partial_record_is_no_session() {
        let storage = MemoryStorage::new();
        storage.set(StorageKeys::TOKEN, "orphan").unwrap();
        let store = CredentialStore::new(Box::new(storage));

        assert!(!store.has_session().unwrap());
    }

    #[test]
    fn test_clear_session() {
        let store = CredentialStore::new(Box::new(MemoryStorage::new()));

        store.set_session("tok-1", &test_user()).unwrap();
        store.clear_session().unwrap();

        assert_eq!(store.token().unwrap(), None);
        assert!(!store.has_session().unwrap());

        // Clearing an already-empty store still succeeds
        store.clear_session().unwrap();
    }

    #[test]
    fn test_malformed_user_is_an_encoding_error() {
        let storage = MemoryStorage::new();
        storage.set(StorageKeys::USER, "{broken").unwrap();
        let store = CredentialStore::new(Box::new(storage));

        let result = store.user::<TestUser>();
        assert!(matches!(result, Err(StorageError::Encoding(_))));
    }
}
