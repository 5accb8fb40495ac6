//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer token issued by the backend (raw string)
    pub const TOKEN: &'static str = "token";

    /// Authenticated user (serialized JSON)
    pub const USER: &'static str = "user";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_constants() {
        assert!(!StorageKeys::TOKEN.is_empty());
        assert!(!StorageKeys::USER.is_empty());
        assert_ne!(StorageKeys::TOKEN, StorageKeys::USER);
    }
}
