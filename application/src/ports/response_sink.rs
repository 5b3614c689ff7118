//! Response sink port
//!
//! The sink is where the visible assistant text of a turn goes: a socket, a
//! terminal, or a channel owned by the hosting program.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Sink write failed: {0}")]
pub struct SinkError(pub String);

/// Byte writer receiving response text as it arrives.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    async fn write(&self, chunk: &[u8]) -> Result<(), SinkError>;
}

/// Sink that discards everything.
pub struct NoSink;

#[async_trait]
impl ResponseSink for NoSink {
    async fn write(&self, _chunk: &[u8]) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink forwarding each chunk to an `mpsc` channel.
///
/// Writes fail once the receiving side is dropped.
pub struct ChannelSink {
    sender: mpsc::Sender<Vec<u8>>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<Vec<u8>>) -> Self {
        Self { sender }
    }

    /// Create a sink and the receiver that observes its writes.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl ResponseSink for ChannelSink {
    async fn write(&self, chunk: &[u8]) -> Result<(), SinkError> {
        self.sender
            .send(chunk.to_vec())
            .await
            .map_err(|_| SinkError("receiver dropped".to_string()))
    }
}
