//! Chat session use case
//!
//! A [`ChatSession`] is one conversation: a bounded history, a default model
//! and a turn lock. A turn appends the caller's input, sends system messages
//! plus the whole history to the model, and commits the assistant reply.
//!
//! # Turn kinds
//!
//! | Turn                | Appends              | Offers tools | Streams        |
//! |---------------------|----------------------|--------------|----------------|
//! | User turn           | user message         | yes, if any  | caller's choice|
//! | Tool-result turn    | tool-result messages | no           | caller's choice|
//!
//! The registry runs a user turn first, dispatches any requested tool calls
//! outside the lock, then runs a tool-result turn with the outcomes.

use super::assemble_response::{AssembledResponse, assemble_response, assemble_stream};
use super::shared_history::SharedHistory;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::ports::response_sink::{ResponseSink, SinkError};
use colloquy_domain::{Message, SessionKey, ToolCall, ToolDefinition};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

/// Errors that can end a turn
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
}

/// Per-turn options.
#[derive(Debug, Clone, Default)]
pub struct TurnOptions {
    /// Overrides the session's default model for this turn.
    pub model: Option<String>,
    /// Prepended to the request; never stored in history.
    pub system_messages: Vec<Message>,
    /// Catalogue offered on a user turn.
    pub tools: Vec<ToolDefinition>,
    /// When non-empty this is a tool-result turn.
    pub tool_results: Vec<Message>,
    pub stream: bool,
}

impl TurnOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system_messages(mut self, messages: Vec<Message>) -> Self {
        self.system_messages = messages;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_results(mut self, results: Vec<Message>) -> Self {
        self.tool_results = results;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn is_tool_result_turn(&self) -> bool {
        !self.tool_results.is_empty()
    }
}

/// One conversation with the model.
pub struct ChatSession {
    key: SessionKey,
    model: String,
    gateway: Arc<dyn LlmGateway>,
    history: SharedHistory,
    last_activity: Mutex<Instant>,
    /// Held for one model request/response cycle.
    turn_lock: tokio::sync::Mutex<()>,
    model_timeout: Duration,
}

impl ChatSession {
    pub fn new(
        key: SessionKey,
        model: impl Into<String>,
        context_size: usize,
        gateway: Arc<dyn LlmGateway>,
    ) -> Self {
        Self {
            key,
            model: model.into(),
            gateway,
            history: SharedHistory::new(context_size),
            last_activity: Mutex::new(Instant::now()),
            turn_lock: tokio::sync::Mutex::new(()),
            model_timeout: Duration::from_secs(180),
        }
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn last_activity(&self) -> Instant {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Time since the session was last used.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity())
    }

    /// Whether a turn currently holds the turn lock.
    pub fn is_busy(&self) -> bool {
        self.turn_lock.try_lock().is_err()
    }

    /// Mark the session as used now.
    pub fn touch(&self) {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Ordered copy of the stored history. Does not wait for a running turn.
    pub fn history(&self) -> Vec<Message> {
        self.history.snapshot()
    }

    /// Restore a persisted history; lists longer than the capacity keep their
    /// newest entries.
    pub fn set_history(&self, messages: Vec<Message>) {
        self.history.replace(messages);
    }

    pub fn context_size(&self) -> usize {
        self.history.capacity()
    }

    /// Run one turn and return the tool calls the model requested.
    ///
    /// Turns on the same session are serialized. Text is forwarded to `sink`
    /// as it arrives; the assistant reply is committed to history only when
    /// the model call completes.
    pub async fn turn(
        &self,
        message: &str,
        options: TurnOptions,
        sink: &dyn ResponseSink,
    ) -> Result<Vec<ToolCall>, TurnError> {
        self.touch();
        let _guard = self.turn_lock.lock().await;
        self.touch();
        let result = self.run_turn(message, options, sink).await;
        self.touch();
        result.map(|response| response.tool_calls)
    }

    /// Feed tool results back and stream the model's final answer.
    pub async fn submit_tool_results(
        &self,
        results: Vec<Message>,
        options: TurnOptions,
        sink: &dyn ResponseSink,
    ) -> Result<Vec<ToolCall>, TurnError> {
        let options = options.with_tool_results(results).with_stream(true);
        self.turn("", options, sink).await
    }

    async fn run_turn(
        &self,
        message: &str,
        options: TurnOptions,
        sink: &dyn ResponseSink,
    ) -> Result<AssembledResponse, TurnError> {
        let tool_result_turn = options.is_tool_result_turn();

        if !message.is_empty() {
            self.history.append(Message::user(message));
        }
        if tool_result_turn {
            self.history.append_many(options.tool_results);
        }

        let mut messages =
            Vec::with_capacity(options.system_messages.len() + self.history.capacity());
        messages.extend(options.system_messages);
        messages.extend(self.history.snapshot());

        let tools = (!tool_result_turn && !options.tools.is_empty()).then_some(options.tools);
        let request = CompletionRequest {
            model: options.model.unwrap_or_else(|| self.model.clone()),
            messages,
            tools,
            stream: options.stream,
        };

        debug!(
            session = %self.key.short(),
            model = %request.model,
            messages = request.messages.len(),
            stream = request.stream,
            "Sending chat request"
        );

        match tokio::time::timeout(self.model_timeout, self.call_model(request, sink)).await {
            Ok(result) => result,
            Err(_) => Err(TurnError::Timeout(self.model_timeout)),
        }
    }

    async fn call_model(
        &self,
        request: CompletionRequest,
        sink: &dyn ResponseSink,
    ) -> Result<AssembledResponse, TurnError> {
        if request.stream {
            let handle = self.gateway.complete_streaming(request).await?;
            assemble_stream(handle, sink, &self.history).await
        } else {
            let response = self.gateway.complete(request).await?;
            assemble_response(response, sink, &self.history).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EchoGateway, RecordingSink, Scripted, ScriptedGateway};
    use colloquy_domain::{LlmResponse, ResponseFragment, Role, StreamEvent, ToolCallDelta};

    fn session(gateway: Arc<dyn LlmGateway>, capacity: usize) -> ChatSession {
        ChatSession::new(SessionKey::derive("tester"), "base-model", capacity, gateway)
    }

    #[tokio::test]
    async fn test_user_turn_appends_user_and_assistant() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Response(
            LlmResponse::from_text("hi there"),
        )]));
        let session = session(gateway.clone(), 10);
        let sink = RecordingSink::new();

        let calls = session.turn("hello", TurnOptions::default(), &sink).await.unwrap();

        assert!(calls.is_empty());
        assert_eq!(
            session.history(),
            vec![Message::user("hello"), Message::assistant("hi there")]
        );
        assert_eq!(sink.text(), "hi there");
    }

    #[tokio::test]
    async fn test_request_carries_system_messages_tools_and_model_override() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Response(
            LlmResponse::from_text("ok"),
        )]));
        let session = session(gateway.clone(), 10);
        let options = TurnOptions::default()
            .with_model("override")
            .with_system_messages(vec![Message::system("be brief")])
            .with_tools(vec![ToolDefinition::new("lookup", "Look things up")]);

        session.turn("q", options, &RecordingSink::new()).await.unwrap();

        let request = &gateway.requests()[0];
        assert_eq!(request.model, "override");
        assert_eq!(
            request.messages,
            vec![Message::system("be brief"), Message::user("q")]
        );
        assert_eq!(request.tools.as_ref().map(Vec::len), Some(1));
        // System messages are never stored
        assert!(session.history().iter().all(|m| m.role != Role::System));
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Stream(vec![
                StreamEvent::Fragment(ResponseFragment::tool_calls(vec![ToolCallDelta::start(
                    "c1", "lookup", "{}",
                )])),
                StreamEvent::Completed,
            ]),
            Scripted::Stream(vec![
                StreamEvent::Fragment(ResponseFragment::text("It is ")),
                StreamEvent::Fragment(ResponseFragment::text("sunny")),
                StreamEvent::Completed,
            ]),
        ]));
        let session = session(gateway.clone(), 10);
        let sink = RecordingSink::new();
        let options = TurnOptions::default()
            .with_tools(vec![ToolDefinition::new("lookup", "Look things up")])
            .with_stream(true);

        let calls = session.turn("weather?", options, &sink).await.unwrap();
        assert_eq!(calls, vec![ToolCall::new("c1", "lookup", "{}")]);

        let follow_up = session
            .submit_tool_results(
                vec![Message::tool_result("c1", "sunny")],
                TurnOptions::default().with_tools(vec![ToolDefinition::new("lookup", "x")]),
                &sink,
            )
            .await
            .unwrap();
        assert!(follow_up.is_empty());

        let requests = gateway.requests();
        assert!(requests[1].stream);
        assert!(requests[1].tools.is_none());

        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0], Message::user("weather?"));
        assert!(history[1].has_tool_calls());
        assert_eq!(history[2], Message::tool_result("c1", "sunny"));
        assert_eq!(history[3], Message::assistant("It is sunny"));
        assert_eq!(sink.text(), "It is sunny");
    }

    #[tokio::test]
    async fn test_gateway_failure_surfaces_and_session_stays_usable() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Scripted::Fail(GatewayError::ConnectionError("refused".into())),
            Scripted::Response(LlmResponse::from_text("back")),
        ]));
        let session = session(gateway, 10);
        let sink = RecordingSink::new();

        let err = session.turn("one", TurnOptions::default(), &sink).await.unwrap_err();
        assert!(matches!(err, TurnError::Gateway(GatewayError::ConnectionError(_))));
        assert_eq!(session.history(), vec![Message::user("one")]);

        session.turn("two", TurnOptions::default(), &sink).await.unwrap();
        assert_eq!(
            session.history(),
            vec![Message::user("one"), Message::user("two"), Message::assistant("back")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_deadline_commits_nothing() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Hang]));
        let session = session(gateway, 10).with_model_timeout(Duration::from_secs(30));

        let err = session
            .turn("hello", TurnOptions::default(), &RecordingSink::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Timeout(d) if d == Duration::from_secs(30)));
        assert_eq!(session.history(), vec![Message::user("hello")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_activity_refreshed_after_turn() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Scripted::Response(
            LlmResponse::from_text("ok"),
        )]));
        let session = session(gateway, 10);
        let created = session.last_activity();

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(session.idle_for(Instant::now()), Duration::from_secs(60));

        session
            .turn("hi", TurnOptions::default(), &RecordingSink::new())
            .await
            .unwrap();
        assert!(session.last_activity() >= created + Duration::from_secs(60));
        assert_eq!(session.idle_for(Instant::now()), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_turn_counts_as_activity() {
        let gateway = Arc::new(EchoGateway::new(Duration::from_secs(30)));
        let session = session(gateway, 10);
        tokio::time::advance(Duration::from_secs(50)).await;

        let sink = RecordingSink::new();
        let (result, ()) = tokio::join!(session.turn("hi", TurnOptions::default(), &sink), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            assert!(session.is_busy());
            assert_eq!(session.idle_for(Instant::now()), Duration::from_secs(10));
        });
        result.unwrap();

        assert!(!session.is_busy());
        assert_eq!(session.idle_for(Instant::now()), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_turns_do_not_interleave() {
        let gateway = Arc::new(EchoGateway::new(Duration::from_millis(50)));
        let session = session(gateway, 10);
        let sink = RecordingSink::new();

        let (a, b) = tokio::join!(
            session.turn("u1", TurnOptions::default(), &sink),
            session.turn("u2", TurnOptions::default(), &sink),
        );
        a.unwrap();
        b.unwrap();

        let history: Vec<String> = session.history().into_iter().map(|m| m.content).collect();
        let first = vec!["u1", "re: u1", "u2", "re: u2"];
        let second = vec!["u2", "re: u2", "u1", "re: u1"];
        assert!(
            history == first || history == second,
            "interleaved history: {:?}",
            history
        );
    }

    #[tokio::test]
    async fn test_restored_history_is_truncated_to_capacity() {
        let session = session(Arc::new(ScriptedGateway::new(vec![])), 3);
        let stored: Vec<Message> = (0..5).map(|i| Message::user(format!("m{}", i))).collect();

        session.set_history(stored.clone());

        assert_eq!(session.history(), stored[2..].to_vec());
        assert_eq!(session.context_size(), 3);
    }
}
