//! Response assembly
//!
//! Turns the model's output, streamed or whole, into the final assistant
//! text and the list of completed tool calls.
//!
//! # Tool-call reassembly
//!
//! Streaming backends split a tool call across fragments. The first fragment
//! of a call carries its id and name; later fragments either repeat the id or
//! leave it empty, meaning "continue the call seen most recently":
//!
//! ```text
//! {id:"a", name:"f", args:"{\"x\":"}   -> pending a = f, "{\"x\":"   (current = a)
//! {id:"",            args:"1}"}        -> pending a = f, "{\"x\":1}"
//! {id:"b", name:"g", args:"{}"}        -> pending b = g, "{}"        (current = b)
//! ```
//!
//! Nothing reaches the session history until the stream ends cleanly. A
//! transport error, a sink failure or a deadline leaves history untouched,
//! though text already written to the sink stays there.

use super::chat_session::TurnError;
use super::shared_history::SharedHistory;
use crate::ports::llm_gateway::{GatewayError, StreamHandle};
use crate::ports::response_sink::ResponseSink;
use colloquy_domain::{LlmResponse, Message, ResponseFragment, StreamEvent, ToolCall, ToolCallDelta};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Final output of one model call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledResponse {
    /// Full assistant text (possibly empty).
    pub text: String,
    /// Completed tool calls, unique by id, in order of first appearance.
    pub tool_calls: Vec<ToolCall>,
}

impl AssembledResponse {
    pub fn tool_call(&self, id: &str) -> Option<&ToolCall> {
        self.tool_calls.iter().find(|call| call.id == id)
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// The assistant message to commit, if the response said anything.
    fn to_message(&self) -> Option<Message> {
        if self.text.is_empty() && self.tool_calls.is_empty() {
            return None;
        }
        Some(Message::assistant_with_tool_calls(
            self.text.clone(),
            self.tool_calls.clone(),
        ))
    }
}

/// Assembly state for one response.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    text: String,
    pending: Vec<ToolCall>,
    index: HashMap<String, usize>,
    /// Position in `pending` of the most recently named call.
    current: Option<usize>,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one fragment: forward its text, then fold in its tool-call deltas.
    pub async fn ingest(
        &mut self,
        fragment: ResponseFragment,
        sink: &dyn ResponseSink,
    ) -> Result<(), TurnError> {
        if let Some(delta) = fragment.text_delta() {
            sink.write(delta.as_bytes()).await?;
            self.text.push_str(delta);
        }
        for delta in fragment.tool_calls {
            self.apply_tool_delta(delta);
        }
        Ok(())
    }

    fn apply_tool_delta(&mut self, delta: ToolCallDelta) {
        if delta.id.is_empty() {
            match self.current {
                Some(position) => self.pending[position].arguments.push_str(&delta.arguments),
                None => warn!("Tool call fragment without id before any named call; ignoring"),
            }
            return;
        }

        let position = match self.index.get(&delta.id) {
            Some(&position) => {
                self.pending[position].arguments.push_str(&delta.arguments);
                position
            }
            None => {
                let position = self.pending.len();
                debug!(call_id = %delta.id, tool = %delta.name, "Tool call started");
                self.index.insert(delta.id.clone(), position);
                self.pending
                    .push(ToolCall::new(delta.id, delta.name, delta.arguments));
                position
            }
        };
        self.current = Some(position);
    }

    /// Finish assembly, discarding the assembly-local state.
    pub fn finish(self) -> AssembledResponse {
        AssembledResponse {
            text: self.text,
            tool_calls: self.pending,
        }
    }
}

/// Drain a stream, forwarding text to `sink`, and commit the result to history.
pub async fn assemble_stream(
    mut handle: StreamHandle,
    sink: &dyn ResponseSink,
    history: &SharedHistory,
) -> Result<AssembledResponse, TurnError> {
    let mut assembler = StreamAssembler::new();

    loop {
        match handle.recv().await {
            Some(StreamEvent::Fragment(fragment)) => assembler.ingest(fragment, sink).await?,
            Some(StreamEvent::Error(e)) => {
                return Err(TurnError::Gateway(GatewayError::StreamError(e)));
            }
            // Channel closed without `Completed`: treat as a graceful end
            Some(StreamEvent::Completed) | None => break,
        }
    }

    Ok(commit(assembler.finish(), history))
}

/// Handle a whole response as a single-fragment stream.
pub async fn assemble_response(
    response: LlmResponse,
    sink: &dyn ResponseSink,
    history: &SharedHistory,
) -> Result<AssembledResponse, TurnError> {
    let fragment = ResponseFragment {
        text: response.text,
        tool_calls: response
            .tool_calls
            .into_iter()
            .map(|call| ToolCallDelta::start(call.id, call.name, call.arguments))
            .collect(),
    };

    let mut assembler = StreamAssembler::new();
    assembler.ingest(fragment, sink).await?;
    Ok(commit(assembler.finish(), history))
}

fn commit(response: AssembledResponse, history: &SharedHistory) -> AssembledResponse {
    if let Some(message) = response.to_message() {
        history.append(message);
    }
    response
}
