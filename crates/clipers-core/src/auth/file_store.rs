use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::{StoreError, TokenStore};

/// Application directory name under the user's cache dir
const APP_NAME: &str = "clipers";

/// Token file name in the cache directory
const TOKEN_FILE: &str = "tokens.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default)]
    tokens: BTreeMap<String, String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Token store persisted as a small JSON file.
///
/// The file is created on the first write and deleted once the last token
/// is removed. Every operation re-reads the file so several processes see
/// each other's refreshes.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    /// Store using `tokens.json` inside `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(TOKEN_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Store under the platform cache directory (`~/.cache/clipers` on Linux).
    pub fn in_default_dir() -> Result<Self, StoreError> {
        let cache_dir = dirs::cache_dir().ok_or(StoreError::NoDirectory)?;
        Ok(Self::new(cache_dir.join(APP_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time of the last write, if the file exists.
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let _guard = self.guard();
        Ok(self.load()?.updated_at)
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load(&self) -> Result<TokenFile, StoreError> {
        if !self.path.exists() {
            return Ok(TokenFile::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(TokenFile::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, mut file: TokenFile) -> Result<(), StoreError> {
        if file.tokens.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        file.updated_at = Some(Utc::now());
        let contents = serde_json::to_string_pretty(&file)?;
        write_private(&self.path, contents.as_bytes())?;
        Ok(())
    }
}

/// Write `contents` to `path` through a sibling temp file created owner-only,
/// then rename it into place. Readers see either the old or the new file.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    // A leftover temp file may carry looser permissions
    match std::fs::remove_file(&tmp) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(&tmp, path)
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.guard();
        Ok(self.load()?.tokens.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut file = self.load()?;
        file.tokens.insert(key.to_string(), value.to_string());
        self.save(file)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut file = self.load()?;
        if file.tokens.remove(key).is_none() {
            return Ok(());
        }
        self.save(file)
    }
}
