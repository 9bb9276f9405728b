//! Core library for the Clipers client.
//!
//! The centre of the crate is [`ApiClient`], an authenticated HTTP client that
//! attaches bearer credentials from a [`TokenStore`] and recovers once from an
//! expired access token by exchanging the refresh token. Everything else
//! (domain services, models, media helpers) is a caller of that client.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use config::ApiConfig;
