//! Data models for Clipers API responses and request payloads.

pub mod cliper;
pub mod company;
pub mod job;
pub mod page;
pub mod post;
pub mod profile;
pub mod user;

pub use cliper::{Cliper, CliperPage, CliperStatus};
pub use company::{Company, CompanyPatch, SocialLink};
pub use job::{
    ApplicationStatus, Job, JobApplication, JobFilters, JobMatch, JobPage, JobPatch, JobType,
    NewJob,
};
pub use page::{merge_unique_by_id, PageRequest};
pub use post::{Comment, ContentUpdate, NewPost, Post, PostPage, PostType};
pub use profile::{AtsProfile, Education, Experience, ProfilePatch, Skill};
pub use user::{LoginRequest, LoginResponse, TokenPair, User, UserRole};
