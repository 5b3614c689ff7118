//! In-memory history store.

use async_trait::async_trait;
use colloquy_application::ports::history_store::{HistoryStore, StoreError};
use colloquy_domain::{Message, SessionKey};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local history store.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<HashMap<SessionKey, Vec<Message>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored histories.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn store(&self, key: &SessionKey, messages: &[Message]) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.clone(), messages.to_vec());
        Ok(())
    }

    async fn load(&self, key: &SessionKey) -> Result<Vec<Message>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_then_load() {
        let store = MemoryHistoryStore::new();
        let key = SessionKey::derive("alice");
        let messages = vec![Message::user("hi"), Message::assistant("hello")];

        store.store(&key, &messages).await.unwrap();

        assert_eq!(store.load(&key).await.unwrap(), messages);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_key_loads_empty() {
        let store = MemoryHistoryStore::new();
        assert!(store.load(&SessionKey::derive("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_replaces_previous_value() {
        let store = MemoryHistoryStore::new();
        let key = SessionKey::derive("alice");

        store.store(&key, &[Message::user("one")]).await.unwrap();
        store.store(&key, &[Message::user("two")]).await.unwrap();

        assert_eq!(store.load(&key).await.unwrap(), vec![Message::user("two")]);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = MemoryHistoryStore::new();
        store
            .store(&SessionKey::derive("a"), &[Message::user("x")])
            .await
            .unwrap();
        store.clear().await.unwrap();

        assert!(store.is_empty().await);
    }
}
