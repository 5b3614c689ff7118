//! Session configuration from TOML (`[session]` section)

use colloquy_application::{SessionConfig, StreamPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw session configuration from TOML
///
/// Durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Default model name
    pub model: String,
    /// History capacity per session
    pub context_size: usize,
    /// Idle time after which a session is evicted
    pub chat_lifetime_secs: u64,
    /// Period of the persistence sweep
    pub save_interval_secs: u64,
    /// Deadline for each tool invocation
    pub tool_timeout_secs: u64,
    /// Deadline for each model call
    pub model_timeout_secs: u64,
    /// System messages prepended to every request
    pub system_messages: Vec<String>,
    /// Streaming policy for the tool-proposing turn
    pub stream: StreamPolicy,
    /// Feed failed tool calls back to the model instead of dropping them
    pub report_tool_failures: bool,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for FileSessionConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            model: config.model.clone(),
            context_size: config.context_size,
            chat_lifetime_secs: config.chat_lifetime.as_secs(),
            save_interval_secs: config.save_interval.as_secs(),
            tool_timeout_secs: config.tool_timeout.as_secs(),
            model_timeout_secs: config.model_timeout.as_secs(),
            system_messages: config.system_messages.clone(),
            stream: config.stream_policy,
            report_tool_failures: config.report_tool_failures,
        }
    }
}

impl FileSessionConfig {
    /// Convert into the application-layer session parameters.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            model: self.model.clone(),
            context_size: self.context_size,
            chat_lifetime: Duration::from_secs(self.chat_lifetime_secs),
            save_interval: Duration::from_secs(self.save_interval_secs),
            tool_timeout: Duration::from_secs(self.tool_timeout_secs),
            model_timeout: Duration::from_secs(self.model_timeout_secs),
            system_messages: self.system_messages.clone(),
            stream_policy: self.stream,
            report_tool_failures: self.report_tool_failures,
        }
    }
}
