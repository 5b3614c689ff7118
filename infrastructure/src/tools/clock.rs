//! Clock tool: the current date and time.

use chrono::{DateTime, SecondsFormat, Utc};
use colloquy_domain::{ToolDefinition, ToolError};
use serde_json::{Map, Value, json};
use std::fmt::Write;

pub const CURRENT_TIME: &str = "current_time";

pub fn current_time_definition() -> ToolDefinition {
    ToolDefinition::new(CURRENT_TIME, "Get the current date and time in UTC").with_properties(
        json!({
            "format": {
                "type": "string",
                "description": "strftime-style format string (default: RFC 3339)"
            }
        }),
    )
}

pub fn execute_current_time(arguments: &Map<String, Value>) -> Result<String, ToolError> {
    format_time(Utc::now(), arguments)
}

fn format_time(now: DateTime<Utc>, arguments: &Map<String, Value>) -> Result<String, ToolError> {
    match arguments.get("format") {
        None | Some(Value::Null) => Ok(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        Some(Value::String(format)) => {
            let mut out = String::new();
            write!(out, "{}", now.format(format)).map_err(|_| {
                ToolError::invalid_argument(format!("Invalid time format: {}", format))
            })?;
            Ok(out)
        }
        Some(other) => Err(ToolError::invalid_argument(format!(
            "'format' must be a string, got {}",
            other
        ))),
    }
}
