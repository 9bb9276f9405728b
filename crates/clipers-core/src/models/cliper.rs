use serde::{Deserialize, Serialize};

/// Processing state of an uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CliperStatus {
    Uploaded,
    Processing,
    Done,
    Failed,
    #[serde(other)]
    Unknown,
}

impl CliperStatus {
    /// Whether the backend has stopped working on the video
    pub fn is_terminal(&self) -> bool {
        matches!(self, CliperStatus::Done | CliperStatus::Failed)
    }
}

/// A short video clip attached to a candidate profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliper {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "videoUrl", default)]
    pub video_url: Option<String>,
    #[serde(rename = "thumbnailUrl", default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default = "default_status")]
    pub status: CliperStatus,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

fn default_status() -> CliperStatus {
    CliperStatus::Uploaded
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliperPage {
    #[serde(default)]
    pub clipers: Vec<Cliper>,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cliper_statuses() {
        let json = r#"[{"id":"1","status":"PROCESSING"},{"id":"2","status":"DONE","videoUrl":"/uploads/2.mp4"},{"id":"3","status":"TRANSCODING"},{"id":"4"}]"#;
        let clipers: Vec<Cliper> = serde_json::from_str(json).unwrap();
        let statuses: Vec<CliperStatus> = clipers.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CliperStatus::Processing,
                CliperStatus::Done,
                CliperStatus::Unknown,
                CliperStatus::Uploaded
            ]
        );
        assert!(CliperStatus::Failed.is_terminal());
        assert!(!CliperStatus::Processing.is_terminal());
    }
}
