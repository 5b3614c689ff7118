//! Tool provider abstraction
//!
//! This module defines the [`ToolProvider`] trait: a source of tools that can
//! be plugged into the tool registry. Tools may come from several providers:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ToolRegistry                 │
//! │  (deduplicated catalogue + name → provider)  │
//! └──────────────────────────────────────────────┘
//!          │                  │
//!          ▼                  ▼
//!    ┌──────────┐       ┌──────────┐
//!    │ Builtin  │       │ Remote   │
//!    │ Provider │       │ servers  │
//!    └──────────┘       └──────────┘
//! ```
//!
//! When two providers offer a tool with the same name, the one registered
//! first keeps it; the registry drops the later definition.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::entities::ToolDefinition;
use super::value_objects::ToolError;

/// Error type for tool provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider is not available (e.g., server unreachable)
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// Failed to discover tools from the provider
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Tool provider abstraction - external source of tools
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier for this provider
    ///
    /// Examples: "builtin", "mcp:filesystem"
    fn id(&self) -> &str;

    /// Display name for user-facing output
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Check if the provider is reachable and configured
    async fn is_available(&self) -> bool {
        true
    }

    /// Discover available tools from this provider
    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError>;

    /// Execute the named tool with a parsed argument object
    ///
    /// Returns the stringified tool output. Deadlines are enforced by the
    /// caller.
    async fn execute(&self, name: &str, arguments: &Map<String, Value>) -> Result<String, ToolError>;
}
