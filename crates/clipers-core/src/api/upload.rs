//! Multipart upload bodies and progress reporting.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use super::ApiError;

/// Size of the chunks file parts are streamed in. Each chunk is one
/// progress tick.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Receives upload progress as a percentage in 0..=100.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub data: Bytes,
}

/// A multipart form: plain text fields plus file parts.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    text: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).map(str::to_string);
        self.files.push(FilePart {
            field: field.into(),
            file_name,
            mime,
            data: data.into(),
        });
        self
    }

    /// Read a file from disk into a file part named after its file name.
    pub async fn file_from_path(
        self,
        field: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            ApiError::InvalidRequest(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(self.file(field, file_name, data))
    }

    pub fn text_fields(&self) -> &[(String, String)] {
        &self.text
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    /// Bytes of file content; progress is measured against this total.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.data.len() as u64).sum()
    }

    /// Build the reqwest form, streaming each file in chunks that report
    /// to `progress` as they are handed to the connection.
    pub(crate) fn into_reqwest(self, progress: Option<ProgressTracker>) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.text {
            form = form.text(name, value);
        }
        for file in self.files {
            let len = file.data.len() as u64;
            let chunks: Vec<Bytes> = (0..file.data.len())
                .step_by(UPLOAD_CHUNK_BYTES)
                .map(|start| {
                    let end = (start + UPLOAD_CHUNK_BYTES).min(file.data.len());
                    file.data.slice(start..end)
                })
                .collect();
            let tracker = progress.clone();
            let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
                if let Some(tracker) = &tracker {
                    tracker.advance(chunk.len() as u64);
                }
                Ok::<Bytes, std::io::Error>(chunk)
            }));

            let mut part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), len)
                .file_name(file.file_name);
            if let Some(mime) = file.mime {
                part = part
                    .mime_str(&mime)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            }
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// Content type for the media files the platform accepts.
fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

/// Percentage of `loaded` over `total`, rounded to the nearest integer.
pub fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let loaded = loaded.min(total);
    ((loaded as f64 * 100.0) / total as f64).round() as u8
}

/// Turns byte counts into progress callbacks.
///
/// Reported values never go down: when a request is re-sent after a token
/// refresh the byte count restarts, but nothing is reported until it passes
/// the last value already shown.
#[derive(Clone)]
pub struct ProgressTracker {
    inner: Arc<ProgressState>,
}

struct ProgressState {
    total: u64,
    loaded: AtomicU64,
    last: Mutex<Option<u8>>,
    callback: ProgressCallback,
}

impl ProgressTracker {
    pub fn new(total: u64, callback: ProgressCallback) -> Self {
        Self {
            inner: Arc::new(ProgressState {
                total,
                loaded: AtomicU64::new(0),
                last: Mutex::new(None),
                callback,
            }),
        }
    }

    pub fn total(&self) -> u64 {
        self.inner.total
    }

    /// Reset the byte count before a new attempt.
    pub fn restart(&self) {
        self.inner.loaded.store(0, Ordering::SeqCst);
    }

    /// Record `bytes` more sent.
    pub fn advance(&self, bytes: u64) {
        let loaded = self.inner.loaded.fetch_add(bytes, Ordering::SeqCst) + bytes;
        self.report(loaded);
    }

    /// Mark the upload complete.
    pub fn finish(&self) {
        self.report(self.inner.total);
    }

    fn report(&self, loaded: u64) {
        // Unknown total: no meaningful percentage.
        if self.inner.total == 0 {
            return;
        }
        let pct = percent(loaded, self.inner.total);
        let mut last = self.inner.last.lock().unwrap_or_else(|e| e.into_inner());
        if last.map_or(true, |prev| pct > prev) {
            *last = Some(pct);
            (self.inner.callback)(pct);
        }
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("total", &self.inner.total)
            .field("loaded", &self.inner.loaded.load(Ordering::SeqCst))
            .finish()
    }
}
