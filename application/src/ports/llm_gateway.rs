//! LLM Gateway port
//!
//! Defines the interface for communicating with chat-completion backends.
//! Wire protocol, authentication and model discovery belong to the adapter.

use async_trait::async_trait;
use colloquy_domain::{LlmResponse, Message, ResponseFragment, StreamEvent, ToolCallDelta, ToolDefinition};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    /// Full message list, system messages first.
    pub messages: Vec<Message>,
    /// Tool catalogue offered to the model. `None` means tools are withheld.
    pub tools: Option<Vec<ToolDefinition>>,
    pub stream: bool,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: None,
            stream: false,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to a model backend.
/// Implementations (adapters) live in the infrastructure layer or in the
/// hosting program.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Run one request and return the whole response at once.
    async fn complete(&self, request: CompletionRequest) -> Result<LlmResponse, GatewayError>;

    /// Run one request and stream the response as fragments.
    ///
    /// Default implementation calls `complete()` and replays the result as a
    /// single fragment followed by `Completed`, so adapters without native
    /// streaming still work.
    async fn complete_streaming(
        &self,
        request: CompletionRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let response = self.complete(request).await?;
        Ok(StreamHandle::from_response(response))
    }
}

/// Handle for receiving streaming events from the gateway.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. A channel that closes without a
/// `Completed` event is treated as a completed stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Create a connected sender/handle pair.
    pub fn channel(buffer: usize) -> (mpsc::Sender<StreamEvent>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::new(rx))
    }

    /// Build a handle that yields the given events and then closes.
    pub fn from_events(events: Vec<StreamEvent>) -> Self {
        let (tx, handle) = Self::channel(events.len());
        for event in events {
            // Capacity covers every event, so this never waits.
            if tx.try_send(event).is_err() {
                break;
            }
        }
        handle
    }

    /// Replay a complete response as one fragment plus `Completed`.
    pub fn from_response(response: LlmResponse) -> Self {
        let fragment = ResponseFragment {
            text: response.text,
            tool_calls: response
                .tool_calls
                .into_iter()
                .map(|call| ToolCallDelta::start(call.id, call.name, call.arguments))
                .collect(),
        };
        Self::from_events(vec![StreamEvent::Fragment(fragment), StreamEvent::Completed])
    }

    /// Receive the next event; `None` once the stream is closed.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }
}
