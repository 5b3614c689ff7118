//! Domain layer for colloquy
//!
//! This crate contains the entities and value objects of the session engine.
//! It has no dependencies on infrastructure or runtime concerns.
//!
//! # Core Concepts
//!
//! - **Message**: one immutable entry of a conversation
//! - **History Buffer**: the fixed-capacity ring a session keeps its messages in
//! - **Session Key**: the hashed identifier sessions are looked up and stored by
//! - **Fragment**: one incremental piece of a streamed model response
//! - **Tool Catalogue**: the deduplicated set of tools offered to the model

pub mod session;
pub mod tool;

// Re-export commonly used types
pub use session::{
    entities::{Message, Role},
    history::HistoryBuffer,
    key::SessionKey,
    response::LlmResponse,
    stream::{ResponseFragment, StreamEvent, ToolCallDelta},
};
pub use tool::{
    entities::{ToolCall, ToolCatalogue, ToolDefinition},
    provider::{ProviderError, ToolProvider},
    value_objects::ToolError,
};
