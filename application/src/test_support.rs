//! Shared test doubles for the use case tests.

use crate::ports::history_store::{HistoryStore, StoreError};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway, StreamHandle};
use crate::ports::response_sink::{ResponseSink, SinkError};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use colloquy_domain::{
    LlmResponse, Message, Role, SessionKey, StreamEvent, ToolCatalogue, ToolDefinition, ToolError,
};
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted gateway reply.
pub enum Scripted {
    Response(LlmResponse),
    Stream(Vec<StreamEvent>),
    Fail(GatewayError),
    /// Never answers within any realistic deadline.
    Hang,
}

/// Gateway replaying a fixed script and recording every request.
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: CompletionRequest) -> Option<Scripted> {
        self.requests.lock().unwrap().push(request);
        self.script.lock().unwrap().pop_front()
    }
}

async fn hang() -> GatewayError {
    tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
    GatewayError::Timeout
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<LlmResponse, GatewayError> {
        match self.next(request) {
            Some(Scripted::Response(response)) => Ok(response),
            Some(Scripted::Stream(_)) => Err(GatewayError::Other("expected a streaming request".into())),
            Some(Scripted::Fail(e)) => Err(e),
            Some(Scripted::Hang) => Err(hang().await),
            None => Err(GatewayError::Other("script exhausted".into())),
        }
    }

    async fn complete_streaming(
        &self,
        request: CompletionRequest,
    ) -> Result<StreamHandle, GatewayError> {
        match self.next(request) {
            Some(Scripted::Response(response)) => Ok(StreamHandle::from_response(response)),
            Some(Scripted::Stream(events)) => Ok(StreamHandle::from_events(events)),
            Some(Scripted::Fail(e)) => Err(e),
            Some(Scripted::Hang) => Err(hang().await),
            None => Err(GatewayError::Other("script exhausted".into())),
        }
    }
}

/// Gateway answering "re: <last user message>" after a delay.
pub struct EchoGateway {
    delay: Duration,
}

impl EchoGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl LlmGateway for EchoGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<LlmResponse, GatewayError> {
        tokio::time::sleep(self.delay).await;
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(LlmResponse::from_text(format!("re: {}", last_user)))
    }
}

/// Sink recording every write; optionally fails after `n` successful writes.
#[derive(Default)]
pub struct RecordingSink {
    writes: Mutex<Vec<Vec<u8>>>,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(writes: usize) -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail_after: Some(writes),
        }
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.writes().concat()).unwrap()
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn write(&self, chunk: &[u8]) -> Result<(), SinkError> {
        let mut writes = self.writes.lock().unwrap();
        if self.fail_after.is_some_and(|limit| writes.len() >= limit) {
            return Err(SinkError("peer hung up".into()));
        }
        writes.push(chunk.to_vec());
        Ok(())
    }
}

#[derive(Clone)]
enum StubBehaviour {
    Output(String),
    Slow(Duration),
    Fail(String),
}

/// Tool executor with canned behaviours per tool name.
#[derive(Clone, Default)]
pub struct StubToolExecutor {
    tools: HashMap<String, StubBehaviour>,
    invocations: Arc<Mutex<Vec<(String, Map<String, Value>)>>>,
}

impl StubToolExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, name: &str, output: &str) -> Self {
        self.tools
            .insert(name.to_string(), StubBehaviour::Output(output.to_string()));
        self
    }

    pub fn with_slow_tool(mut self, name: &str, delay: Duration) -> Self {
        self.tools.insert(name.to_string(), StubBehaviour::Slow(delay));
        self
    }

    pub fn with_failing_tool(mut self, name: &str, message: &str) -> Self {
        self.tools
            .insert(name.to_string(), StubBehaviour::Fail(message.to_string()));
        self
    }

    pub fn invocations(&self) -> Vec<(String, Map<String, Value>)> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutorPort for StubToolExecutor {
    fn catalogue(&self) -> ToolCatalogue {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        names.into_iter().fold(ToolCatalogue::new(), |catalogue, name| {
            catalogue.register(ToolDefinition::new(name.as_str(), "stub tool"))
        })
    }

    async fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        _timeout: Duration,
    ) -> Result<String, ToolError> {
        self.invocations
            .lock()
            .unwrap()
            .push((name.to_string(), arguments));

        match self.tools.get(name).cloned() {
            Some(StubBehaviour::Output(output)) => Ok(output),
            Some(StubBehaviour::Slow(delay)) => {
                tokio::time::sleep(delay).await;
                Ok("slow result".to_string())
            }
            Some(StubBehaviour::Fail(message)) => Err(ToolError::execution_failed(message)),
            None => Err(ToolError::not_found(name)),
        }
    }
}

/// In-memory store recording every `store` call.
#[derive(Default)]
pub struct RecordingStore {
    data: Mutex<HashMap<SessionKey, Vec<Message>>>,
    stores: Mutex<Vec<(SessionKey, Vec<Message>)>>,
    fail_loads: bool,
    fail_stores: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: SessionKey, messages: Vec<Message>) -> Self {
        self.data.lock().unwrap().insert(key, messages);
        self
    }

    pub fn failing_loads(mut self) -> Self {
        self.fail_loads = true;
        self
    }

    pub fn failing_stores(mut self) -> Self {
        self.fail_stores = true;
        self
    }

    pub fn stored_calls(&self) -> Vec<(SessionKey, Vec<Message>)> {
        self.stores.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for RecordingStore {
    async fn store(&self, key: &SessionKey, messages: &[Message]) -> Result<(), StoreError> {
        self.stores
            .lock()
            .unwrap()
            .push((key.clone(), messages.to_vec()));
        if self.fail_stores {
            return Err(StoreError::Backend("store unavailable".into()));
        }
        self.data
            .lock()
            .unwrap()
            .insert(key.clone(), messages.to_vec());
        Ok(())
    }

    async fn load(&self, key: &SessionKey) -> Result<Vec<Message>, StoreError> {
        if self.fail_loads {
            return Err(StoreError::Backend("store unavailable".into()));
        }
        Ok(self
            .data
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.data.lock().unwrap().clear();
        Ok(())
    }
}
