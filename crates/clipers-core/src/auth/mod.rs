//! Credential storage for the API client.
//!
//! This module provides:
//! - `TokenStore`: the get/set/remove capability the client reads tokens from
//! - `MemoryTokenStore`: in-process backing for tests and one-shot tools
//! - `KeyringTokenStore`: OS keychain backing via `keyring`
//! - `FileTokenStore`: JSON file in the user's cache directory
//!
//! Tokens live under the keys `accessToken` and `refreshToken`.

pub mod credentials;
pub mod file_store;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use file_store::FileTokenStore;
pub use store::{MemoryTokenStore, StoreError, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
