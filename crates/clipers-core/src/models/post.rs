use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostType {
    Text,
    Image,
    Video,
    Cliper,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default)]
    pub post_type: Option<PostType>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "videoUrl", default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub likes: u32,
    /// Comments embedded by the feed endpoint; may be empty even when the
    /// post has comments, use `FeedService::comments` for the full list.
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "videoUrl", skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl NewPost {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            post_type: PostType::Text,
            image_url: None,
            video_url: None,
        }
    }
}

/// Body of post and comment edits.
#[derive(Debug, Clone, Serialize)]
pub struct ContentUpdate {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}
