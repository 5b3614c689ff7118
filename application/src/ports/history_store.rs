//! History persistence port
//!
//! A [`HistoryStore`] is a key/value store mapping a [`SessionKey`] to the
//! ordered message list of that session. The registry loads from it when a
//! session is first seen and writes to it from the periodic sweep.

use async_trait::async_trait;
use colloquy_domain::{Message, SessionKey};
use thiserror::Error;

/// Errors raised by history store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Key/value persistence for session histories.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist the ordered message list under `key`, replacing any previous value.
    async fn store(&self, key: &SessionKey, messages: &[Message]) -> Result<(), StoreError>;

    /// Load the list stored under `key`. A key that was never stored yields
    /// an empty list.
    async fn load(&self, key: &SessionKey) -> Result<Vec<Message>, StoreError>;

    /// Remove every stored history.
    async fn clear(&self) -> Result<(), StoreError>;
}
