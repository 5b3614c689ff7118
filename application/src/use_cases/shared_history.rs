//! Lock-guarded history buffer shared between a session and its readers.

use colloquy_domain::{HistoryBuffer, Message};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A [`HistoryBuffer`] behind a short-lived reader/writer lock.
///
/// Readers (history queries, the persistence sweep) never wait for a turn in
/// progress; they only contend with the brief append at the end of a model
/// call.
#[derive(Debug)]
pub struct SharedHistory {
    inner: RwLock<HistoryBuffer>,
}

impl SharedHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(HistoryBuffer::new(capacity)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HistoryBuffer> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HistoryBuffer> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ordered copy of the stored messages.
    pub fn snapshot(&self) -> Vec<Message> {
        self.read().snapshot()
    }

    pub fn append(&self, message: Message) {
        self.write().append(message);
    }

    pub fn append_many(&self, messages: impl IntoIterator<Item = Message>) {
        self.write().append_many(messages);
    }

    pub fn replace(&self, messages: impl IntoIterator<Item = Message>) {
        self.write().replace(messages);
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Ring capacity.
    pub fn capacity(&self) -> usize {
        self.read().length()
    }

    pub fn stored(&self) -> usize {
        self.read().stored()
    }
}
