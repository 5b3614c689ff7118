//! Tool executor port
//!
//! Defines the interface the dispatcher uses to run model-requested tools.

use async_trait::async_trait;
use colloquy_domain::{ToolCatalogue, ToolError};
use serde_json::{Map, Value};
use std::time::Duration;

/// Port for looking up and invoking tools.
///
/// Implementations live in the infrastructure layer (see `ToolRegistry`).
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Snapshot of the tools currently offered to the model.
    fn catalogue(&self) -> ToolCatalogue;

    /// Number of registered tools.
    fn tool_count(&self) -> usize {
        self.catalogue().len()
    }

    fn has_tool(&self, name: &str) -> bool {
        self.catalogue().contains(name)
    }

    /// Invoke the named tool, giving up after `timeout`.
    async fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        timeout: Duration,
    ) -> Result<String, ToolError>;
}

/// Executor with an empty catalogue.
pub struct NoTools;

#[async_trait]
impl ToolExecutorPort for NoTools {
    fn catalogue(&self) -> ToolCatalogue {
        ToolCatalogue::new()
    }

    async fn invoke(
        &self,
        name: &str,
        _arguments: Map<String, Value>,
        _timeout: Duration,
    ) -> Result<String, ToolError> {
        Err(ToolError::not_found(name))
    }
}
