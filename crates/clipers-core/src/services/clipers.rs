use std::path::Path;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, ProgressCallback, RequestOptions, UploadForm};
use crate::models::{merge_unique_by_id, Cliper, CliperPage, PageRequest};

/// Feed page size for clipers.
pub const CLIPER_PAGE_SIZE: u32 = 12;

/// How often and for how long to poll a freshly uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Short video clips: listing, upload and processing status.
#[derive(Clone)]
pub struct CliperService {
    api: ApiClient,
}

impl CliperService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, page: u32) -> Result<CliperPage, ApiError> {
        let mut options = RequestOptions::new();
        options.query = PageRequest::new(page, CLIPER_PAGE_SIZE).to_query();
        self.api.get_with("/clipers", options).await
    }

    /// Fetch up to `pages` pages starting at `first`, stopping early when the
    /// backend reports no more. Items repeated across pages are merged by id.
    pub async fn list_pages(&self, first: u32, pages: u32) -> Result<CliperPage, ApiError> {
        let mut merged = CliperPage {
            clipers: Vec::new(),
            has_more: true,
            total_pages: 0,
        };
        for page in first..first.saturating_add(pages) {
            let next = self.list(page).await?;
            merge_unique_by_id(&mut merged.clipers, next.clipers, |c| c.id.as_str());
            merged.has_more = next.has_more;
            merged.total_pages = next.total_pages;
            if !next.has_more {
                break;
            }
        }
        debug!(first, count = merged.clipers.len(), has_more = merged.has_more, "Listed clipers");
        Ok(merged)
    }

    /// Clipers of the logged-in user.
    pub async fn mine(&self) -> Result<Vec<Cliper>, ApiError> {
        self.api.get("/clipers/my").await
    }

    pub async fn get(&self, cliper_id: &str) -> Result<Cliper, ApiError> {
        self.api.get(&format!("/clipers/{}", cliper_id)).await
    }

    /// Upload video bytes as a new cliper.
    pub async fn upload(
        &self,
        file_name: &str,
        video: impl Into<bytes::Bytes>,
        title: &str,
        description: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Cliper, ApiError> {
        let form = UploadForm::new()
            .file("video", file_name, video)
            .text("title", title)
            .text("description", description);
        self.upload_form(form, on_progress).await
    }

    /// Upload a video file from disk as a new cliper.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        title: &str,
        description: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Cliper, ApiError> {
        let form = UploadForm::new()
            .file_from_path("video", path)
            .await?
            .text("title", title)
            .text("description", description);
        self.upload_form(form, on_progress).await
    }

    async fn upload_form(
        &self,
        form: UploadForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Cliper, ApiError> {
        let bytes = form.total_bytes();
        let cliper: Cliper = self.api.upload("/clipers/upload", form, on_progress).await?;
        info!(cliper_id = %cliper.id, bytes, "Cliper uploaded");
        Ok(cliper)
    }

    /// Poll until the backend finishes processing (`DONE` or `FAILED`) or
    /// the timeout passes. Transient errors are logged and polling continues.
    /// Returns the last state seen, if any poll succeeded.
    pub async fn wait_until_processed(
        &self,
        cliper_id: &str,
        settings: PollSettings,
    ) -> Option<Cliper> {
        let started = Instant::now();
        let mut last = None;

        loop {
            tokio::time::sleep(settings.interval).await;

            match self.get(cliper_id).await {
                Ok(cliper) => {
                    debug!(cliper_id, status = ?cliper.status, "Polled cliper");
                    let done = cliper.status.is_terminal();
                    last = Some(cliper);
                    if done {
                        return last;
                    }
                }
                Err(e) => warn!(cliper_id, error = %e, "Cliper status poll failed"),
            }

            if started.elapsed() >= settings.timeout {
                warn!(cliper_id, "Gave up waiting for cliper processing");
                return last;
            }
        }
    }

    pub async fn delete(&self, cliper_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self.api.delete(&format!("/clipers/{}", cliper_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::api::RequestBody;
    use crate::auth::MemoryTokenStore;
    use crate::models::CliperStatus;
    use crate::test_support::{client_with, ok_json, status, FakeTransport};

    #[tokio::test]
    async fn test_list_uses_page_size_12() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![ok_json(json!({"clipers": [{"id": "1"}], "hasMore": true}))]),
            MemoryTokenStore::new(),
        );

        let page = client.clipers().list(1).await.unwrap();

        assert!(page.has_more);
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://host/api/clipers");
        assert_eq!(
            request.query,
            vec![("page".to_string(), "1".to_string()), ("size".to_string(), "12".to_string())]
        );
    }

    #[tokio::test]
    async fn test_list_pages_merges_overlap_with_newest_state() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![
                ok_json(json!({
                    "clipers": [{"id": "1", "status": "DONE"}, {"id": "2", "status": "PROCESSING"}],
                    "hasMore": true,
                    "totalPages": 3
                })),
                ok_json(json!({
                    "clipers": [{"id": "2", "status": "DONE"}, {"id": "3"}],
                    "hasMore": false,
                    "totalPages": 2
                })),
            ]),
            MemoryTokenStore::new(),
        );

        let page = client.clipers().list_pages(0, 5).await.unwrap();

        let ids: Vec<&str> = page.clipers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(page.clipers[1].status, CliperStatus::Done);
        assert!(!page.has_more);
        assert_eq!(page.total_pages, 2);
        // Stopped once the backend reported the last page
        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.requests()[1].query[0], ("page".to_string(), "1".to_string()));
    }

    #[tokio::test]
    async fn test_upload_sends_video_title_description() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![ok_json(json!({"id": "c9", "status": "PROCESSING"}))]),
            MemoryTokenStore::with_tokens("A1", "R1"),
        );
        let seen = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink = Arc::clone(&seen);

        let cliper = client
            .clipers()
            .upload(
                "intro.mp4",
                vec![1u8; 2048],
                "Intro",
                "About me",
                Some(Arc::new(move |p: u8| sink.lock().unwrap().push(p))),
            )
            .await
            .unwrap();

        assert_eq!(cliper.id, "c9");
        assert_eq!(cliper.status, CliperStatus::Processing);
        assert_eq!(seen.lock().unwrap().last(), Some(&100));

        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://host/api/clipers/upload");
        let RequestBody::Multipart(form) = &request.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.files()[0].field, "video");
        assert_eq!(form.files()[0].file_name, "intro.mp4");
        assert_eq!(
            form.text_fields(),
            &[
                ("title".to_string(), "Intro".to_string()),
                ("description".to_string(), "About me".to_string())
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_processed_stops_on_done() {
        let (client, transport, _, _) = client_with(
            FakeTransport::scripted(vec![
                ok_json(json!({"id": "c1", "status": "PROCESSING"})),
                status(502, "gateway"),
                ok_json(json!({"id": "c1", "status": "DONE", "videoUrl": "/uploads/c1.mp4"})),
            ]),
            MemoryTokenStore::new(),
        );

        let cliper = client
            .clipers()
            .wait_until_processed("c1", PollSettings::default())
            .await
            .unwrap();

        assert_eq!(cliper.status, CliperStatus::Done);
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_until_processed_gives_up_after_timeout() {
        let transport = FakeTransport::new(|_| ok_json(json!({"id": "c1", "status": "PROCESSING"})));
        let (client, transport, _, _) = client_with(transport, MemoryTokenStore::new());
        let settings = PollSettings {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(10),
        };

        let cliper = client.clipers().wait_until_processed("c1", settings).await.unwrap();

        assert_eq!(cliper.status, CliperStatus::Processing);
        // Polls at 3s, 6s, 9s and 12s; the last one crosses the deadline
        assert_eq!(transport.request_count(), 4);
    }
}
