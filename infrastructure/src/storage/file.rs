//! Directory-backed history store.
//!
//! Layout: one `<key>.json` file per session, holding the ordered message
//! list. Keys are hex digests, so they are always safe file names. Writes go
//! to a temporary file first and are renamed into place.

use async_trait::async_trait;
use colloquy_application::ports::history_store::{HistoryStore, StoreError};
use colloquy_domain::{Message, SessionKey};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSION: &str = "json";

/// History store writing JSON documents into a directory.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &SessionKey) -> PathBuf {
        self.dir.join(format!("{}.{}", key.as_str(), EXTENSION))
    }
}

fn io_error(context: &str, path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io(format!("{} {}: {}", context, path.display(), err))
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn store(&self, key: &SessionKey, messages: &[Message]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec(messages)?;

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| io_error("write", &tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error("rename", &path, e))?;

        debug!(session = %key.short(), messages = messages.len(), "Stored history");
        Ok(())
    }

    async fn load(&self, key: &SessionKey) -> Result<Vec<Message>, StoreError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(serde_json::from_slice(&body)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(io_error("read", &path, e)),
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_error("list", &self.dir, e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("list", &self.dir, e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| io_error("remove", &path, e))?;
            }
        }
        Ok(())
    }
}
