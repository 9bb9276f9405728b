use crate::api::{ApiClient, ApiError, RequestOptions};
use crate::models::{Comment, ContentUpdate, NewPost, PageRequest, Post, PostPage};

/// Feed page size.
pub const POST_PAGE_SIZE: u32 = 10;

#[derive(Clone)]
pub struct FeedService {
    api: ApiClient,
}

impl FeedService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn posts(&self, page: u32) -> Result<PostPage, ApiError> {
        let mut options = RequestOptions::new();
        options.query = PageRequest::new(page, POST_PAGE_SIZE).to_query();
        self.api.get_with("/posts", options).await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ApiError> {
        if post.content.trim().is_empty() && post.image_url.is_none() && post.video_url.is_none() {
            return Err(ApiError::InvalidRequest("Post is empty".to_string()));
        }
        self.api.post("/posts", post).await
    }

    /// Replace the text of one of the current user's posts.
    pub async fn update_post(&self, post_id: &str, content: &str) -> Result<Post, ApiError> {
        let body = content_update(content, "Post")?;
        self.api.put(&format!("/posts/{}", post_id), &body).await
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/posts/{}", post_id)).await?;
        Ok(())
    }

    /// Toggle the current user's like on a post.
    pub async fn like(&self, post_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.post_empty(&format!("/posts/{}/like", post_id)).await?;
        Ok(())
    }

    pub async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.api.get(&format!("/posts/{}/comments", post_id)).await
    }

    /// Add a comment. Content is trimmed; blank comments never leave the client.
    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment, ApiError> {
        let body = content_update(content, "Comment")?;
        self.api.post(&format!("/posts/{}/comments", post_id), &body).await
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, ApiError> {
        let body = content_update(content, "Comment")?;
        self.api
            .put(&format!("/posts/{}/comments/{}", post_id, comment_id), &body)
            .await
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .api
            .delete(&format!("/posts/{}/comments/{}", post_id, comment_id))
            .await?;
        Ok(())
    }
}

/// Trimmed edit body; blank text is rejected before any request.
fn content_update(content: &str, what: &str) -> Result<ContentUpdate, ApiError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ApiError::InvalidRequest(format!("{} is empty", what)));
    }
    Ok(ContentUpdate {
        content: content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use crate::api::{ApiError, RequestBody};
    use crate::auth::MemoryTokenStore;
    use crate::models::NewPost;
    use crate::test_support::{client_with, ok_json, status, FakeTransport};

    #[tokio::test]
    async fn test_add_comment_trims_content() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![ok_json(json!({"id": "k1", "content": "Nice clip"}))]),
            MemoryTokenStore::with_tokens("A1", "R1"),
        );

        let comment = client.feed().add_comment("p1", "  Nice clip \n").await.unwrap();

        assert_eq!(comment.content, "Nice clip");
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://host/api/posts/p1/comments");
        assert!(matches!(&request.body, RequestBody::Json(v) if v == &json!({"content": "Nice clip"})));
    }

    #[tokio::test]
    async fn test_blank_comment_and_post_rejected_locally() {
        let (client, transport, _, _) =
            client_with(FakeTransport::scripted(vec![]), MemoryTokenStore::new());

        let err = client.feed().add_comment("p1", "   ").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        let err = client.feed().create_post(&NewPost::text(" ")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_posts_like_and_comments() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![
                ok_json(json!({
                    "posts": [{
                        "id": "p1",
                        "content": "Hola",
                        "likes": 2,
                        "createdAt": "2024-05-01T10:00:00",
                        "comments": [{"id": "k1", "content": "Hi", "user": {"id": "u2"}}]
                    }],
                    "hasMore": false
                })),
                ok_json(json!({"liked": true})),
                ok_json(json!([{"id": "k1", "content": "Hi"}])),
            ]),
            MemoryTokenStore::with_tokens("A1", "R1"),
        );
        let feed = client.feed();

        let page = feed.posts(0).await.unwrap();
        feed.like("p1").await.unwrap();
        let comments = feed.comments("p1").await.unwrap();

        assert_eq!(page.posts[0].content, "Hola");
        assert_eq!(page.posts[0].comments.len(), 1);
        assert_eq!(page.posts[0].comments[0].id, "k1");
        assert_eq!(comments.len(), 1);
        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://host/api/posts");
        assert_eq!(requests[1].url, "https://host/api/posts/p1/like");
        assert_eq!(requests[2].url, "https://host/api/posts/p1/comments");
    }

    #[tokio::test]
    async fn test_edit_and_delete_post_and_comment() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![
                ok_json(json!({"id": "p1", "content": "Edited"})),
                ok_json(json!({"id": "k1", "content": "Fixed typo"})),
                status(204, ""),
                status(204, ""),
            ]),
            MemoryTokenStore::with_tokens("A1", "R1"),
        );
        let feed = client.feed();

        let post = feed.update_post("p1", " Edited ").await.unwrap();
        let comment = feed.update_comment("p1", "k1", "Fixed typo\n").await.unwrap();
        feed.delete_comment("p1", "k1").await.unwrap();
        feed.delete_post("p1").await.unwrap();

        assert_eq!(post.content, "Edited");
        assert_eq!(comment.content, "Fixed typo");
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(requests[0].url, "https://host/api/posts/p1");
        assert!(matches!(&requests[0].body, RequestBody::Json(v) if v == &json!({"content": "Edited"})));
        assert_eq!(requests[1].method, Method::PUT);
        assert_eq!(requests[1].url, "https://host/api/posts/p1/comments/k1");
        assert_eq!(requests[2].method, Method::DELETE);
        assert_eq!(requests[2].url, "https://host/api/posts/p1/comments/k1");
        assert_eq!(requests[3].method, Method::DELETE);
        assert_eq!(requests[3].url, "https://host/api/posts/p1");
    }

    #[tokio::test]
    async fn test_blank_edits_rejected_locally() {
        let (client, transport, _, _) =
            client_with(FakeTransport::scripted(vec![]), MemoryTokenStore::new());

        assert!(matches!(
            client.feed().update_post("p1", "  ").await,
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            client.feed().update_comment("p1", "k1", "").await,
            Err(ApiError::InvalidRequest(_))
        ));
        assert_eq!(transport.request_count(), 0);
    }
}
