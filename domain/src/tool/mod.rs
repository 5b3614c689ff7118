//! Tool domain module
//!
//! Tools give the model capabilities beyond text generation. A tool is
//! described by a [`ToolDefinition`] (name, description, JSON parameter
//! schema), requested by the model as a [`ToolCall`], and answered with a
//! tool-result message.
//!
//! ```text
//! ┌───────────────┐    ┌──────────────┐    ┌────────────────────┐
//! │ ToolCatalogue │───▶│ ToolCall     │───▶│ Message::tool_result│
//! │ (offered)     │    │ (requested)  │    │ (answered)          │
//! └───────────────┘    └──────────────┘    └────────────────────┘
//! ```
//!
//! # Deduplication
//!
//! The [`ToolCatalogue`] is keyed by tool name. Registering a name that is
//! already present is a no-op: the first definition wins and later ones are
//! dropped, never merged.
//!
//! # Key Types
//!
//! - [`ToolCatalogue`]: ordered, deduplicated set of definitions
//! - [`ToolDefinition`]: schema for a single tool
//! - [`ToolCall`]: a completed call request with raw argument text
//! - [`ToolError`]: failure of a single invocation
//! - [`ToolProvider`]: source of tools (builtin, remote servers, ...)

pub mod entities;
pub mod provider;
pub mod value_objects;

pub use entities::{ToolCall, ToolCatalogue, ToolDefinition};
pub use provider::{ProviderError, ToolProvider};
pub use value_objects::ToolError;
