use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::models::{LoginRequest, LoginResponse, User};

/// Login and logout. Tokens created here are what the client refreshes.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a token pair and persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, ApiError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Email and password are required".to_string(),
            ));
        }

        let response: LoginResponse = self
            .api
            .post("/auth/login", &LoginRequest { email, password })
            .await?;
        self.api.tokens().store_pair(&response.tokens)?;
        info!("Logged in");
        Ok(response.user)
    }

    /// Forget both tokens locally.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.api.tokens().clear()?;
        info!("Logged out");
        Ok(())
    }

    /// Whether an access token is stored. Says nothing about its validity.
    pub fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.api.tokens().access_token()?.is_some())
    }

    /// Profile of the logged-in user.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.api.get("/auth/me").await
    }
}
