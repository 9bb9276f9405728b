use crate::api::{ApiClient, ApiError};
use crate::models::{Company, CompanyPatch};

#[derive(Clone)]
pub struct CompanyService {
    api: ApiClient,
}

impl CompanyService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Company profile owned by a user account.
    pub async fn by_user(&self, user_id: &str) -> Result<Company, ApiError> {
        self.api.get(&format!("/companies/user/{}", user_id)).await
    }

    pub async fn get(&self, company_id: &str) -> Result<Company, ApiError> {
        self.api.get(&format!("/companies/{}", company_id)).await
    }

    pub async fn update(&self, company_id: &str, patch: &CompanyPatch) -> Result<Company, ApiError> {
        self.api.put(&format!("/companies/{}", company_id), patch).await
    }
}
