//! Authenticated REST client for the Clipers backend.
//!
//! This module provides the `ApiClient`, which attaches the stored access
//! token to every request and, when the backend answers 401, exchanges the
//! refresh token once and retries the original request. The wire is behind
//! the `Transport` trait so the refresh logic can run against fakes.

pub mod client;
pub mod error;
pub mod transport;
pub mod upload;

pub use client::{ApiClient, AuthExpiredHook, RequestOptions, LOGIN_ROUTE};
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, RequestBody, ReqwestTransport, Transport};
pub use upload::{FilePart, ProgressCallback, ProgressTracker, UploadForm};
