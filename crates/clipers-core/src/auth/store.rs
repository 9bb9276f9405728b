use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::models::TokenPair;

/// Key of the short-lived bearer credential.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Key of the long-lived credential exchanged on expiry.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token file is corrupt: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Could not find a directory for the token file")]
    NoDirectory,
}

/// Process-wide key-value area holding the credential pair.
///
/// Implementations are synchronous; every backing in this crate completes
/// in microseconds (memory, keychain, small local file).
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.get(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.get(REFRESH_TOKEN_KEY)
    }

    /// Persist both tokens, as done after a login.
    fn store_pair(&self, pair: &TokenPair) -> Result<(), StoreError> {
        self.set(ACCESS_TOKEN_KEY, &pair.access_token)?;
        self.set(REFRESH_TOKEN_KEY, &pair.refresh_token)
    }

    /// Remove both tokens. Both removals are attempted even if the first fails.
    fn clear(&self) -> Result<(), StoreError> {
        let access = self.remove(ACCESS_TOKEN_KEY);
        let refresh = self.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }
}

/// Token store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a credential pair.
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let store = Self::new();
        {
            let mut entries = store.lock();
            entries.insert(ACCESS_TOKEN_KEY.to_string(), access_token.to_string());
            entries.insert(REFRESH_TOKEN_KEY.to_string(), refresh_token.to_string());
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}
