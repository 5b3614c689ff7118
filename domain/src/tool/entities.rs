//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a tool that can be offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_time")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema of the argument object
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a definition taking no arguments.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
            }),
        }
    }

    /// Set the full parameter schema.
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Wrap a `properties` map into an object schema.
    pub fn with_properties(self, properties: serde_json::Value) -> Self {
        self.with_parameters(serde_json::json!({
            "type": "object",
            "properties": properties,
        }))
    }
}

/// Deduplicated, ordered set of tools offered to the model
///
/// Keyed by tool name; the first registration of a name wins.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalogue {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool (builder pattern). Duplicate names are dropped.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.insert(tool);
        self
    }

    /// Insert a tool. Returns `false` (and drops `tool`) if the name is taken.
    pub fn insert(&mut self, tool: ToolDefinition) -> bool {
        if self.index.contains_key(&tool.name) {
            return false;
        }
        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(tool);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Definitions in registration order.
    pub fn all(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A completed tool call requested by the model
///
/// `arguments` is the raw JSON text exactly as the model produced it; it is
/// parsed only when the call is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned call id, echoed back in the tool-result message
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// JSON argument text
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parse the argument text as a JSON object.
    ///
    /// Blank argument text is treated as an empty object, since models emit
    /// `""` for tools without parameters.
    pub fn parse_arguments(
        &self,
    ) -> Result<serde_json::Map<String, serde_json::Value>, serde_json::Error> {
        if self.arguments.trim().is_empty() {
            return Ok(serde_json::Map::new());
        }
        serde_json::from_str(&self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("get_weather", "Current weather").with_properties(
            serde_json::json!({"city": {"type": "string"}}),
        );

        assert_eq!(tool.name, "get_weather");
        assert_eq!(tool.parameters["type"], "object");
        assert_eq!(tool.parameters["properties"]["city"]["type"], "string");
    }

    #[test]
    fn test_catalogue_first_registration_wins() {
        let catalogue = ToolCatalogue::new()
            .register(ToolDefinition::new("search", "first"))
            .register(ToolDefinition::new("fetch", "fetch"))
            .register(ToolDefinition::new("search", "second"));

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.get("search").unwrap().description, "first");
        assert_eq!(catalogue.names().collect::<Vec<_>>(), vec!["search", "fetch"]);
    }

    #[test]
    fn test_catalogue_insert_reports_duplicates() {
        let mut catalogue = ToolCatalogue::new();
        assert!(catalogue.insert(ToolDefinition::new("a", "")));
        assert!(!catalogue.insert(ToolDefinition::new("a", "")));
        assert!(catalogue.contains("a"));
        assert!(!catalogue.contains("b"));
        assert!(catalogue.get("b").is_none());
    }

    #[test]
    fn test_parse_arguments() {
        let call = ToolCall::new("c1", "f", r#"{"x":1}"#);
        let args = call.parse_arguments().unwrap();
        assert_eq!(args["x"], 1);

        assert!(ToolCall::new("c2", "f", "  ").parse_arguments().unwrap().is_empty());
        assert!(ToolCall::new("c3", "f", r#"{"x":"#).parse_arguments().is_err());
        assert!(ToolCall::new("c4", "f", "[1,2]").parse_arguments().is_err());
    }
}
