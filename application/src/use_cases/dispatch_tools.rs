//! Tool dispatch use case
//!
//! Runs every tool call the model requested concurrently and turns the
//! outcomes into tool-result messages for the follow-up turn.

use crate::ports::tool_executor::ToolExecutorPort;
use colloquy_domain::{Message, ToolCall, ToolError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Concurrent tool-call dispatcher.
///
/// Each call is parsed, routed and bounded by its own deadline. A failure
/// (malformed arguments, unknown tool, execution error or timeout) only
/// affects that call; siblings keep running.
pub struct ToolDispatcher {
    executor: Arc<dyn ToolExecutorPort>,
    timeout: Duration,
    report_failures: bool,
}

impl ToolDispatcher {
    pub fn new(executor: Arc<dyn ToolExecutorPort>, timeout: Duration) -> Self {
        Self {
            executor,
            timeout,
            report_failures: false,
        }
    }

    /// When enabled, a failed call produces a tool-result message describing
    /// the failure instead of being dropped.
    pub fn with_failure_reports(mut self, report: bool) -> Self {
        self.report_failures = report;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run all calls and return their results in completion order.
    pub async fn dispatch(&self, calls: Vec<ToolCall>) -> Vec<Message> {
        if calls.is_empty() {
            return Vec::new();
        }

        info!("Dispatching {} tool call(s)", calls.len());
        let mut join_set = JoinSet::new();

        for call in calls {
            let executor = Arc::clone(&self.executor);
            let timeout = self.timeout;

            join_set.spawn(async move {
                let result = Self::run_call(executor.as_ref(), &call, timeout).await;
                (call, result)
            });
        }

        let mut results = Vec::with_capacity(join_set.len());

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((call, Ok(output))) => {
                    debug!(tool = %call.name, call_id = %call.id, "Tool call succeeded");
                    results.push(Message::tool_result(call.id, output));
                }
                Ok((call, Err(e))) => {
                    warn!(tool = %call.name, call_id = %call.id, error = %e, "Tool call failed");
                    if self.report_failures {
                        results.push(Message::tool_result(
                            call.id,
                            format!("Tool call failed: {}", e),
                        ));
                    }
                }
                Err(e) => {
                    warn!("Tool task join error: {}", e);
                }
            }
        }

        results
    }

    async fn run_call(
        executor: &dyn ToolExecutorPort,
        call: &ToolCall,
        timeout: Duration,
    ) -> Result<String, ToolError> {
        let arguments = call.parse_arguments().map_err(|e| {
            ToolError::invalid_argument(format!("Malformed arguments for '{}': {}", call.name, e))
        })?;

        match tokio::time::timeout(timeout, executor.invoke(&call.name, arguments, timeout)).await
        {
            Ok(result) => result,
            Err(_) => Err(ToolError::timeout(&call.name)),
        }
    }
}
