use std::path::Path;

use tracing::info;

use crate::api::{ApiClient, ApiError, ProgressCallback, UploadForm};
use crate::models::{AtsProfile, ProfilePatch, User};

const PROFILE_PATH: &str = "/users/profile";

const AVATAR_PATH: &str = "/users/profile/avatar";

/// Multipart field carrying the avatar image
const AVATAR_FIELD: &str = "file";

/// The signed-in user's own profile: account fields, avatar and ATS CV.
#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn load(&self) -> Result<User, ApiError> {
        self.api.get(PROFILE_PATH).await
    }

    pub async fn update(&self, patch: &ProfilePatch) -> Result<User, ApiError> {
        if patch.is_empty() {
            return Err(ApiError::InvalidRequest("Nothing to update".to_string()));
        }
        self.api.put(PROFILE_PATH, patch).await
    }

    /// Upload image bytes as the new avatar. Only image types are sent.
    pub async fn upload_avatar(
        &self,
        file_name: &str,
        image: impl Into<bytes::Bytes>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<User, ApiError> {
        let form = UploadForm::new().file(AVATAR_FIELD, file_name, image);
        self.send_avatar(form, on_progress).await
    }

    pub async fn upload_avatar_file(
        &self,
        path: impl AsRef<Path>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<User, ApiError> {
        let form = UploadForm::new().file_from_path(AVATAR_FIELD, path).await?;
        self.send_avatar(form, on_progress).await
    }

    async fn send_avatar(
        &self,
        form: UploadForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<User, ApiError> {
        let is_image = form
            .files()
            .iter()
            .all(|f| f.mime.as_deref().is_some_and(|m| m.starts_with("image/")));
        if !is_image {
            return Err(ApiError::InvalidRequest(
                "Avatar must be a PNG, JPEG, GIF or WebP image".to_string(),
            ));
        }
        let user: User = self.api.upload(AVATAR_PATH, form, on_progress).await?;
        info!(user_id = %user.id, "Avatar updated");
        Ok(user)
    }

    pub async fn delete_avatar(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(AVATAR_PATH).await?;
        Ok(())
    }

    /// CV extracted by the backend for candidates.
    pub async fn ats_profile(&self) -> Result<AtsProfile, ApiError> {
        self.api.get("/ats/profile").await
    }
}
