//! Storage configuration from TOML (`[storage]` section)

use crate::storage::{FileHistoryStore, MemoryHistoryStore};
use colloquy_application::HistoryStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Which history store backs the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local; histories are lost on exit
    Memory,
    /// One JSON document per session under `dir`
    #[default]
    File,
}

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: StorageBackend,
    /// Directory for the file backend (default: platform data dir)
    pub dir: Option<String>,
}

impl FileStorageConfig {
    /// Directory the file backend writes to.
    ///
    /// Falls back to `$XDG_DATA_HOME/colloquy/histories` (or the platform
    /// equivalent), then to `./.colloquy/histories`.
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|d| d.join("colloquy"))
                .unwrap_or_else(|| PathBuf::from(".colloquy"))
                .join("histories"),
        }
    }

    /// Construct the configured store.
    pub fn build_store(&self) -> Arc<dyn HistoryStore> {
        match self.backend {
            StorageBackend::Memory => Arc::new(MemoryHistoryStore::new()),
            StorageBackend::File => Arc::new(FileHistoryStore::new(self.resolved_dir())),
        }
    }
}
