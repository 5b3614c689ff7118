//! Streaming events for model responses.
//!
//! [`StreamEvent`] represents individual events of a streaming completion.
//! A stream is a sequence of [`Fragment`](StreamEvent::Fragment)s ended by
//! [`Completed`](StreamEvent::Completed), or aborted by
//! [`Error`](StreamEvent::Error). A channel that closes without either is a
//! graceful end as well.
//!
//! # Tool call deltas
//!
//! Tool calls arrive in pieces. The first delta of a call carries its `id` and
//! `name`; later deltas for the same call usually carry an **empty** `id` and
//! only an `arguments` fragment, meaning "continue the most recent call":
//!
//! ```text
//! {id: "a", name: "f", arguments: "{\"x\":"}
//! {id: "",             arguments: "1}"}       → call a: f({"x":1})
//! ```

/// Incremental tool call data from one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallDelta {
    /// Call id; empty means "append to the most recently seen call".
    pub id: String,
    /// Function name (sent with the first delta of a call).
    pub name: String,
    /// Fragment of the JSON argument text.
    pub arguments: String,
}

impl ToolCallDelta {
    /// First delta of a call.
    pub fn start(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Continuation delta (empty id).
    pub fn continuation(arguments: impl Into<String>) -> Self {
        Self {
            arguments: arguments.into(),
            ..Self::default()
        }
    }
}

/// One incremental piece of a streaming model response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFragment {
    /// Assistant text delta.
    pub text: Option<String>,
    /// Tool call deltas, in arrival order.
    pub tool_calls: Vec<ToolCallDelta>,
}

impl ResponseFragment {
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            text: Some(delta.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_calls(deltas: Vec<ToolCallDelta>) -> Self {
        Self {
            text: None,
            tool_calls: deltas,
        }
    }

    /// The text delta, if present and non-empty.
    pub fn text_delta(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// An event in a streaming model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A response fragment.
    Fragment(ResponseFragment),
    /// Explicit end-of-stream marker.
    Completed,
    /// A transport error; aborts the stream.
    Error(String),
}
