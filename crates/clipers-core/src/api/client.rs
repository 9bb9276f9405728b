//! API client for communicating with the Clipers REST API.
//!
//! Every call reads the access token from the injected `TokenStore` and
//! sends it as a bearer credential. A 401 triggers at most one refresh
//! exchange per request:
//!
//! ```text
//! Pending -> Success
//! Pending -> Failed(401) -> Refreshing -> Retried -> Success | Failed
//! Pending -> Failed(other)
//! ```
//!
//! When the exchange itself fails both tokens are cleared and the
//! auth-expired hook runs before the error is returned.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::auth::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::config::ApiConfig;

use super::transport::{ApiRequest, ApiResponse, RequestBody, ReqwestTransport, Transport};
use super::upload::{ProgressCallback, ProgressTracker, UploadForm};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Route the hosting application should send the user to once the session
/// cannot be recovered.
pub const LOGIN_ROUTE: &str = "/auth/login";

/// Endpoint exchanging a refresh token for a new access token
const REFRESH_PATH: &str = "/auth/refresh";

const JSON_CONTENT_TYPE: &str = "application/json";

const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Called once the session is unrecoverable (refresh failed, tokens cleared).
pub type AuthExpiredHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    // Some deployments rotate the refresh token as well
    #[serde(rename = "refreshToken", default)]
    refresh_token: Option<String>,
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query pair only when a value is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of handling a 401.
enum Recovery {
    /// A fresh access token is stored; re-send the request.
    Retry,
    /// Nothing to exchange; the original error stands.
    NoRefreshToken,
    /// The exchange failed and the session was torn down.
    Expired,
}

/// API client for Clipers.
/// Clone is cheap - every field is shared behind an Arc.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ApiConfig>,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    on_auth_expired: AuthExpiredHook,
    // Serializes refresh exchanges so concurrent 401s share one refresh.
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a client over HTTP using the given config and token store.
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, tokens, Arc::new(transport)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        config: ApiConfig,
        tokens: Arc<dyn TokenStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            tokens,
            on_auth_expired: Arc::new(|| {
                warn!(route = LOGIN_ROUTE, "Session expired, login required");
            }),
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Replace the hook run when the session cannot be recovered.
    pub fn on_auth_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_auth_expired = Arc::new(hook);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    // ===== Verbs =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, RequestBody::Empty, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::json(body)?, RequestOptions::default())
            .await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, RequestBody::json(body)?, RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, RequestBody::Empty, RequestOptions::default())
            .await
    }

    /// POST a multipart form, reporting progress as a 0-100 percentage.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: UploadForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<T, ApiError> {
        let progress = on_progress.map(|callback| ProgressTracker::new(form.total_bytes(), callback));
        let response = self
            .dispatch(
                Method::POST,
                path,
                RequestBody::Multipart(form),
                RequestOptions::default(),
                progress.clone(),
            )
            .await?;
        if let Some(progress) = &progress {
            progress.finish();
        }
        response.json()
    }

    /// General entry point all verbs route through.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.dispatch(method, path, body, options, None).await?.json()
    }

    // ===== Dispatch =====

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        options: RequestOptions,
        progress: Option<ProgressTracker>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.config.endpoint(path);
        let mut retried = false;

        loop {
            let access_token = self.tokens.access_token()?;
            let request = self.prepare(
                method.clone(),
                &url,
                &body,
                &options,
                access_token.as_deref(),
                progress.clone(),
            )?;
            if let Some(progress) = &progress {
                progress.restart();
            }

            debug!(method = %method, url = %url, retried, "API request");
            let error = match self.send(request).await {
                Ok(response) if response.is_success() => {
                    debug!(method = %method, url = %url, status = response.status.as_u16(), "API response");
                    return Ok(response);
                }
                Ok(response) => ApiError::from_status(response.status.as_u16(), &response.text()),
                Err(e) => e,
            };

            if error.is_unauthorized() && !retried {
                retried = true;
                warn!(method = %method, url = %url, "Access token rejected, attempting refresh");
                match self.recover_session(access_token.as_deref()).await? {
                    Recovery::Retry => continue,
                    Recovery::NoRefreshToken => {}
                    Recovery::Expired => {
                        error!(method = %method, url = %url, "Session expired");
                        return Err(ApiError::AuthExpired(Box::new(error)));
                    }
                }
            }

            error!(method = %method, url = %url, status = ?error.status(), error = %error, "API request failed");
            return Err(error);
        }
    }

    fn prepare(
        &self,
        method: Method,
        url: &str,
        body: &RequestBody,
        options: &RequestOptions,
        access_token: Option<&str>,
        progress: Option<ProgressTracker>,
    ) -> Result<ApiRequest, ApiError> {
        let mut headers = HeaderMap::new();
        let content_type = if body.is_multipart() {
            MULTIPART_CONTENT_TYPE
        } else {
            JSON_CONTENT_TYPE
        };
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        if let Some(token) = access_token {
            headers.insert(AUTHORIZATION, bearer_header(token)?);
        }

        Ok(ApiRequest {
            method,
            url: url.to_string(),
            headers,
            query: options.query.clone(),
            body: body.clone(),
            timeout: options.timeout.unwrap_or_else(|| self.config.timeout()),
            progress,
        })
    }

    /// Send through the transport under the request's overall deadline.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let deadline = request.timeout;
        tokio::time::timeout(deadline, self.transport.send(request))
            .await
            .unwrap_or(Err(ApiError::Timeout))
    }

    // ===== Token refresh =====

    /// Handle a 401 for a request that was sent with `rejected_token`.
    async fn recover_session(&self, rejected_token: Option<&str>) -> Result<Recovery, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        // Another request may have refreshed while this one waited.
        let current = self.tokens.access_token()?;
        if current.is_some() && current.as_deref() != rejected_token {
            debug!("Access token already refreshed by a concurrent request");
            return Ok(Recovery::Retry);
        }

        let Some(refresh_token) = self.tokens.refresh_token()? else {
            debug!("No refresh token stored");
            return Ok(Recovery::NoRefreshToken);
        };

        match self.exchange_refresh_token(&refresh_token).await {
            Ok(refreshed) => {
                self.tokens.set(ACCESS_TOKEN_KEY, &refreshed.access_token)?;
                if let Some(rotated) = refreshed.refresh_token.filter(|t| !t.is_empty()) {
                    self.tokens.set(REFRESH_TOKEN_KEY, &rotated)?;
                }
                info!("Access token refreshed");
                Ok(Recovery::Retry)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.expire_session();
                Ok(Recovery::Expired)
            }
        }
    }

    /// `POST /auth/refresh`, sent without a bearer header and outside the
    /// 401 handling so a rejected refresh cannot recurse.
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let body = RequestBody::json(&RefreshRequest { refresh_token })?;
        let url = self.config.endpoint(REFRESH_PATH);
        let request = self.prepare(
            Method::POST,
            &url,
            &body,
            &RequestOptions::default(),
            None,
            None,
        )?;

        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::from_status(response.status.as_u16(), &response.text()));
        }
        let refreshed: RefreshResponse = response.json()?;
        if refreshed.access_token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "Refresh response carried an empty access token".to_string(),
            ));
        }
        Ok(refreshed)
    }

    fn expire_session(&self) {
        if let Err(e) = self.tokens.clear() {
            error!(error = %e, "Failed to clear stored tokens");
        }
        (self.on_auth_expired)();
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        ApiError::InvalidRequest("Access token contains characters not allowed in a header".to_string())
    })?;
    value.set_sensitive(true);
    Ok(value)
}
