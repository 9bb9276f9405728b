//! Typed wrappers over `ApiClient`, one per area of the platform.
//!
//! Services hold a cheap clone of the client and only know endpoints and
//! payload shapes; authentication and refresh stay in the client.

pub mod auth;
pub mod clipers;
pub mod companies;
pub mod feed;
pub mod jobs;
pub mod profile;

pub use auth::AuthService;
pub use clipers::{CliperService, PollSettings};
pub use companies::CompanyService;
pub use feed::FeedService;
pub use jobs::JobService;
pub use profile::ProfileService;

use crate::api::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    pub fn jobs(&self) -> JobService {
        JobService::new(self.clone())
    }

    pub fn clipers(&self) -> CliperService {
        CliperService::new(self.clone())
    }

    pub fn feed(&self) -> FeedService {
        FeedService::new(self.clone())
    }

    pub fn companies(&self) -> CompanyService {
        CompanyService::new(self.clone())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.clone())
    }
}
