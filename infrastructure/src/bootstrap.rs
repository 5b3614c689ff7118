//! Wiring helpers: build a ready-to-run [`SessionRegistry`] from file
//! configuration.

use crate::config::FileConfig;
use crate::logging::JsonlConversationLogger;
use colloquy_application::{LlmGateway, SessionRegistry, ToolExecutorPort};
use std::sync::Arc;
use tracing::info;

/// Build a registry with the configured store and conversation log.
///
/// The sweeper is not started; call
/// [`SessionRegistry::start_sweeper`] on the result.
pub fn build_registry(
    config: &FileConfig,
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
) -> Arc<SessionRegistry> {
    let session_config = config.session.to_session_config();
    let store = config.storage.build_store();

    info!(
        model = %session_config.model,
        backend = ?config.storage.backend,
        tools = tools.tool_count(),
        "Building session registry"
    );

    let mut registry = SessionRegistry::new(session_config, gateway, tools, store);

    if let Some(path) = &config.logging.conversation_log
        && let Some(logger) = JsonlConversationLogger::new(path)
    {
        info!("Conversation log: {}", logger.path().display());
        registry = registry.with_conversation_logger(Arc::new(logger));
    }

    Arc::new(registry)
}
