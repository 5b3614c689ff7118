//! Application layer for colloquy
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{SessionConfig, StreamPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    history_store::{HistoryStore, StoreError},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway, StreamHandle},
    response_sink::{ChannelSink, NoSink, ResponseSink, SinkError},
    tool_executor::{NoTools, ToolExecutorPort},
};
pub use use_cases::assemble_response::{AssembledResponse, StreamAssembler};
pub use use_cases::chat_session::{ChatSession, TurnError, TurnOptions};
pub use use_cases::dispatch_tools::ToolDispatcher;
pub use use_cases::session_registry::{SessionRegistry, SweepReport, SweeperHandle};
pub use use_cases::shared_history::SharedHistory;
