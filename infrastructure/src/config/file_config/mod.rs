//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

mod logging;
mod session;
mod storage;

pub use logging::FileLoggingConfig;
pub use session::FileSessionConfig;
pub use storage::{FileStorageConfig, StorageBackend};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("session.model cannot be empty")]
    EmptyModelName,

    #[error("session.context_size cannot be 0")]
    ZeroContextSize,

    #[error("session.{0} cannot be 0")]
    ZeroDuration(&'static str),

    #[error("storage.dir cannot be empty")]
    EmptyStorageDir,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Session settings
    pub session: FileSessionConfig,
    /// History storage settings
    pub storage: FileStorageConfig,
    /// Structured log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let session = &self.session;

        if session.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if session.context_size == 0 {
            return Err(ConfigValidationError::ZeroContextSize);
        }

        let durations = [
            ("chat_lifetime_secs", session.chat_lifetime_secs),
            ("save_interval_secs", session.save_interval_secs),
            ("tool_timeout_secs", session.tool_timeout_secs),
            ("model_timeout_secs", session.model_timeout_secs),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigValidationError::ZeroDuration(*field));
        }

        if self
            .storage
            .dir
            .as_deref()
            .is_some_and(|dir| dir.trim().is_empty())
        {
            return Err(ConfigValidationError::EmptyStorageDir);
        }

        Ok(())
    }
}
