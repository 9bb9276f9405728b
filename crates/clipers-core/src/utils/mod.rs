//! Utility functions for display formatting and media paths.

pub mod format;
pub mod media;

pub use format::*;
pub use media::{media_url, PLACEHOLDER_IMAGE};
