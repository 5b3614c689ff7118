//! Bounded conversation history.
//!
//! [`HistoryBuffer`] is a fixed-capacity ring of [`Message`]s. Once the ring is
//! full every append overwrites the oldest slot, so memory per session stays
//! bounded no matter how long the conversation runs.
//!
//! ```text
//! capacity = 4, after appending m1..m6:
//!
//!   slots: [ m5 | m6 | m3 | m4 ]
//!                      ▲ next
//!   snapshot(): m3, m4, m5, m6
//! ```
//!
//! # Capacity vs. occupancy
//!
//! [`length()`](HistoryBuffer::length) reports the **capacity** of the ring, not
//! how many messages it holds. Callers use it to size allocations for outgoing
//! requests. Use [`stored()`](HistoryBuffer::stored) for the occupancy.

use super::entities::Message;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-capacity ring buffer of conversation messages.
///
/// Serializes as the ordered list returned by [`snapshot()`](Self::snapshot).
/// Deserializing yields a full buffer whose capacity is the list length; use
/// [`from_messages()`](Self::from_messages) to restore into a configured size.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    slots: Vec<Option<Message>>,
    /// Slot the next append writes to; also the oldest slot once full.
    next: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` messages.
    ///
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            next: 0,
        }
    }

    /// Create a buffer and fill it with `messages` in order.
    pub fn from_messages(capacity: usize, messages: impl IntoIterator<Item = Message>) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.append_many(messages);
        buffer
    }

    /// Insert at the next ring position, overwriting the oldest entry if full.
    pub fn append(&mut self, message: Message) {
        self.slots[self.next] = Some(message);
        self.next = (self.next + 1) % self.slots.len();
    }

    /// Append each message in order.
    pub fn append_many(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.append(message);
        }
    }

    /// Append a restored list into the ring.
    ///
    /// Meant for freshly created buffers being restored from storage. Lists
    /// longer than the capacity keep only their newest entries.
    pub fn replace(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.append_many(messages);
    }

    /// The stored messages, oldest first. Slots never written are skipped.
    pub fn snapshot(&self) -> Vec<Message> {
        let (newer, older) = self.slots.split_at(self.next);
        older.iter().chain(newer).flatten().cloned().collect()
    }

    /// Empty every slot. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.next = 0;
    }

    /// Capacity of the ring (NOT the number of stored messages).
    pub fn length(&self) -> usize {
        self.slots.len()
    }

    /// Number of messages currently stored.
    pub fn stored(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl Serialize for HistoryBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.snapshot())
    }
}

impl<'de> Deserialize<'de> for HistoryBuffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let messages = Vec::<Message>::deserialize(deserializer)?;
        Ok(Self::from_messages(messages.len(), messages))
    }
}
