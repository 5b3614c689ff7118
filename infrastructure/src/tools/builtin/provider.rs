//! Built-in tool provider
//!
//! Provides a small set of local tools that need no external process or
//! server: the clock and echo tools.

use async_trait::async_trait;
use colloquy_domain::{ProviderError, ToolCatalogue, ToolDefinition, ToolError, ToolProvider};
use serde_json::{Map, Value};

use crate::tools::{clock, echo};

/// Built-in tool provider
#[derive(Debug, Clone)]
pub struct BuiltinProvider {
    catalogue: ToolCatalogue,
}

impl BuiltinProvider {
    /// Create a new built-in provider with all tools
    pub fn new() -> Self {
        Self {
            catalogue: crate::tools::builtin_catalogue(),
        }
    }
}

impl Default for BuiltinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProvider for BuiltinProvider {
    fn id(&self) -> &str {
        "builtin"
    }

    fn display_name(&self) -> &str {
        "Built-in Tools"
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(self.catalogue.all().to_vec())
    }

    async fn execute(&self, name: &str, arguments: &Map<String, Value>) -> Result<String, ToolError> {
        match name {
            clock::CURRENT_TIME => clock::execute_current_time(arguments),
            echo::ECHO => echo::execute_echo(arguments),
            _ => Err(ToolError::not_found(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_builtin_provider_is_available() {
        let provider = BuiltinProvider::new();
        assert!(provider.is_available().await);
        assert_eq!(provider.display_name(), "Built-in Tools");
    }

    #[tokio::test]
    async fn test_builtin_provider_discover_tools() {
        let provider = BuiltinProvider::new();
        let tools = provider.discover_tools().await.unwrap();

        let tool_names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tool_names, vec!["current_time", "echo"]);
    }

    #[tokio::test]
    async fn test_builtin_provider_execute() {
        let provider = BuiltinProvider::new();
        let mut args = Map::new();
        args.insert("text".into(), json!("ping"));

        assert_eq!(provider.execute("echo", &args).await.unwrap(), "ping");

        let err = provider.execute("echo", &Map::new()).await.unwrap_err();
        assert_eq!(err.code, ToolError::INVALID_ARGUMENT);

        let now = provider.execute("current_time", &Map::new()).await.unwrap();
        assert!(now.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_builtin_provider_unknown_tool() {
        let provider = BuiltinProvider::new();
        let err = provider.execute("rm_rf", &Map::new()).await.unwrap_err();
        assert_eq!(err.code, ToolError::NOT_FOUND);
    }
}
