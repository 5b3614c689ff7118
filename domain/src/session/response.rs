//! Complete (non-streamed) model responses.

use crate::tool::entities::ToolCall;

/// A complete response from the model.
///
/// The non-streaming counterpart of a fragment stream: the full assistant
/// text plus fully formed tool calls.
///
/// # Examples
///
/// ```
/// use colloquy_domain::{LlmResponse, ToolCall};
///
/// let response = LlmResponse::from_text("Hello!");
/// assert_eq!(response.text_content(), "Hello!");
/// assert!(!response.has_tool_calls());
///
/// let response = LlmResponse::from_tool_calls(vec![
///     ToolCall::new("call_1", "get_time", "{}"),
/// ]);
/// assert!(response.has_tool_calls());
/// assert_eq!(response.text_content(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmResponse {
    /// Assistant text, if the model produced any.
    pub text: Option<String>,
    /// Tool calls requested by the model.
    pub tool_calls: Vec<ToolCall>,
    /// Model identifier (if returned by the backend).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Create a response that only requests tool calls.
    pub fn from_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::default()
        }
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// The assistant text, or an empty string.
    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Returns `true` if the response contains any tool calls.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
