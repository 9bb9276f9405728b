//! API client configuration.
//!
//! The base URL is taken from `CLIPERS_API_URL` (or passed explicitly) and is
//! normalized so it always ends in exactly one `/api` segment, whatever
//! trailing slashes or suffix the raw value carried.

use std::time::Duration;

/// Environment variable holding the backend URL.
pub const API_URL_ENV: &str = "CLIPERS_API_URL";

/// Backend used when nothing is configured.
pub const DEFAULT_API_URL: &str = "https://backend.clipers.pro/api";

/// Path segment every request is routed under.
const API_SUFFIX: &str = "/api";

/// Overall deadline for a single HTTP exchange.
/// 30s leaves room for large video uploads on slow links.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    timeout: Duration,
}

impl ApiConfig {
    /// Build a config from a raw base URL, normalizing it.
    pub fn new(raw_base: &str) -> Self {
        Self {
            base_url: normalize_base_url(raw_base),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Build a config from `CLIPERS_API_URL`, falling back to the public backend.
    pub fn from_env() -> Self {
        let raw = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(&raw)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Effective base URL, always ending in `/api`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Backend origin without the `/api` segment, used for media paths.
    pub fn origin(&self) -> &str {
        self.base_url
            .strip_suffix(API_SUFFIX)
            .unwrap_or(&self.base_url)
    }

    /// Resolve a relative API path against the base URL.
    ///
    /// Absolute `http(s)://` URLs pass through untouched.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Strip trailing slashes and make sure the URL ends in a single `/api`.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.ends_with(API_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_SUFFIX)
    }
}
