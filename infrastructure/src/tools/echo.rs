//! Echo tool: returns its input. Handy for checking a tool round-trip.

use colloquy_domain::{ToolDefinition, ToolError};
use serde_json::{Map, Value, json};

pub const ECHO: &str = "echo";

pub fn echo_definition() -> ToolDefinition {
    ToolDefinition::new(ECHO, "Return the given text unchanged").with_parameters(json!({
        "type": "object",
        "properties": {
            "text": { "type": "string", "description": "Text to return" }
        },
        "required": ["text"]
    }))
}

pub fn execute_echo(arguments: &Map<String, Value>) -> Result<String, ToolError> {
    match arguments.get("text") {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ToolError::invalid_argument("'text' must be a string")),
        None => Err(ToolError::invalid_argument("Missing required argument: text")),
    }
}
