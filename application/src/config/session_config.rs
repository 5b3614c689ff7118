//! Session parameters: model, history size, lifetimes and deadlines.
//!
//! [`SessionConfig`] holds everything the [`SessionRegistry`] needs to create
//! sessions and run the background sweep. The file-backed loader in the
//! infrastructure layer converts its TOML representation into this type.
//!
//! [`SessionRegistry`]: crate::use_cases::session_registry::SessionRegistry

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether the tool-proposing turn streams its text to the sink.
///
/// The follow-up turn that consumes tool results always streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamPolicy {
    /// Stream only when no tools are registered.
    #[default]
    Auto,
    /// Always stream, assembling tool calls from fragments.
    Always,
    /// Never stream the tool-proposing turn.
    Never,
}

impl StreamPolicy {
    /// Resolve the policy for a user turn given the registered tool count.
    pub fn streams_user_turn(self, tool_count: usize) -> bool {
        match self {
            StreamPolicy::Auto => tool_count == 0,
            StreamPolicy::Always => true,
            StreamPolicy::Never => false,
        }
    }
}

/// Parameters shared by every session in a registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Default model for every request.
    pub model: String,
    /// History ring capacity per session.
    pub context_size: usize,
    /// Sessions idle for longer than this are evicted by the sweep.
    pub chat_lifetime: Duration,
    /// Period of the background sweep.
    pub save_interval: Duration,
    /// Deadline for each tool invocation.
    pub tool_timeout: Duration,
    /// Deadline for one model call, including stream assembly.
    pub model_timeout: Duration,
    /// Prepended to every request, never stored in history.
    pub system_messages: Vec<String>,
    pub stream_policy: StreamPolicy,
    /// Feed failed tool calls back to the model as error results instead of
    /// dropping them.
    pub report_tool_failures: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "qwen3:8b".to_string(),
            context_size: 500,
            chat_lifetime: Duration::from_secs(7 * 24 * 60 * 60),
            save_interval: Duration::from_secs(5 * 60),
            tool_timeout: Duration::from_secs(60),
            model_timeout: Duration::from_secs(180),
            system_messages: Vec::new(),
            stream_policy: StreamPolicy::Auto,
            report_tool_failures: false,
        }
    }
}

impl SessionConfig {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_context_size(mut self, size: usize) -> Self {
        self.context_size = size;
        self
    }

    pub fn with_chat_lifetime(mut self, lifetime: Duration) -> Self {
        self.chat_lifetime = lifetime;
        self
    }

    pub fn with_save_interval(mut self, interval: Duration) -> Self {
        self.save_interval = interval;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_system_message(mut self, content: impl Into<String>) -> Self {
        self.system_messages.push(content.into());
        self
    }

    pub fn with_stream_policy(mut self, policy: StreamPolicy) -> Self {
        self.stream_policy = policy;
        self
    }

    pub fn with_report_tool_failures(mut self, report: bool) -> Self {
        self.report_tool_failures = report;
        self
    }
}
