//! Session registry use case
//!
//! The [`SessionRegistry`] owns every live [`ChatSession`], keyed by a hash of
//! the caller's id. It restores history from the [`HistoryStore`] the first
//! time a session is seen and runs the tool round-trip around each user turn.
//!
//! # Sweep
//!
//! A background task started by [`SessionRegistry::start_sweeper`] ticks every
//! `save_interval`. Each tick evicts sessions idle for longer than
//! `chat_lifetime` (their last stored snapshot remains in the store) and
//! stores a snapshot of every other session. The sweep reads history without
//! taking a session's turn lock, so a snapshot may miss a reply still being
//! assembled; the next tick picks it up.

use super::chat_session::{ChatSession, TurnError, TurnOptions};
use super::dispatch_tools::ToolDispatcher;
use crate::config::SessionConfig;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::history_store::HistoryStore;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::response_sink::ResponseSink;
use crate::ports::tool_executor::ToolExecutorPort;
use colloquy_domain::{Message, SessionKey};
use futures::future::join_all;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Outcome of one sweep tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub persisted: usize,
    pub failed: usize,
}

/// Map of live sessions plus the collaborators every session shares.
pub struct SessionRegistry {
    config: SessionConfig,
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    store: Arc<dyn HistoryStore>,
    dispatcher: ToolDispatcher,
    conversation_logger: Arc<dyn ConversationLogger>,
    sessions: RwLock<HashMap<SessionKey, Arc<ChatSession>>>,
}

impl SessionRegistry {
    pub fn new(
        config: SessionConfig,
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        store: Arc<dyn HistoryStore>,
    ) -> Self {
        let dispatcher = ToolDispatcher::new(Arc::clone(&tools), config.tool_timeout)
            .with_failure_reports(config.report_tool_failures);

        Self {
            config,
            gateway,
            tools,
            store,
            dispatcher,
            conversation_logger: Arc::new(NoConversationLogger),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn read_sessions(&self) -> RwLockReadGuard<'_, HashMap<SessionKey, Arc<ChatSession>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sessions(&self) -> RwLockWriteGuard<'_, HashMap<SessionKey, Arc<ChatSession>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session_count(&self) -> usize {
        self.read_sessions().len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read_sessions().contains_key(&SessionKey::derive(id))
    }

    /// History of a live session; empty when the id is unknown.
    pub fn history(&self, id: &str) -> Vec<Message> {
        self.read_sessions()
            .get(&SessionKey::derive(id))
            .map(|session| session.history())
            .unwrap_or_default()
    }

    /// Run one user turn, including the tool round-trip.
    ///
    /// Errors are logged and suppressed; text already written to `sink` stays
    /// written.
    pub async fn turn(&self, id: &str, message: &str, sink: &dyn ResponseSink) {
        let session = self.session_for(id).await;

        if let Err(e) = self.run_turn(&session, message, sink).await {
            error!(session = %session.key().short(), error = %e, "Chat turn failed");
            self.conversation_logger.log(ConversationEvent::new(
                "turn_failed",
                json!({
                    "session": session.key().as_str(),
                    "error": e.to_string(),
                }),
            ));
        }
    }

    async fn run_turn(
        &self,
        session: &ChatSession,
        message: &str,
        sink: &dyn ResponseSink,
    ) -> Result<(), TurnError> {
        let catalogue = self.tools.catalogue();
        let stream = self.config.stream_policy.streams_user_turn(catalogue.len());

        let options = TurnOptions::default()
            .with_system_messages(self.system_messages())
            .with_tools(catalogue.all().to_vec())
            .with_stream(stream);
        let tool_calls = session.turn(message, options, sink).await?;

        if tool_calls.is_empty() {
            self.log_turn_completed(session, 0);
            return Ok(());
        }

        let requested = tool_calls.len();
        let results = self.dispatcher.dispatch(tool_calls).await;
        self.conversation_logger.log(ConversationEvent::new(
            "tool_dispatch",
            json!({
                "session": session.key().as_str(),
                "requested": requested,
                "results": results.len(),
            }),
        ));

        if results.is_empty() {
            warn!(
                session = %session.key().short(),
                "Every tool call failed; skipping follow-up turn"
            );
            return Ok(());
        }

        let options = TurnOptions::default().with_system_messages(self.system_messages());
        let follow_up = session.submit_tool_results(results, options, sink).await?;
        if !follow_up.is_empty() {
            debug!(
                session = %session.key().short(),
                "Ignoring {} tool call(s) requested after tool results",
                follow_up.len()
            );
        }

        self.log_turn_completed(session, requested);
        Ok(())
    }

    fn system_messages(&self) -> Vec<Message> {
        self.config
            .system_messages
            .iter()
            .map(|content| Message::system(content.as_str()))
            .collect()
    }

    fn log_turn_completed(&self, session: &ChatSession, tool_calls: usize) {
        self.conversation_logger.log(ConversationEvent::new(
            "turn_completed",
            json!({
                "session": session.key().as_str(),
                "tool_calls": tool_calls,
                "history": session.history().len(),
            }),
        ));
    }

    /// Look up the session for `id`, creating and restoring it if needed.
    async fn session_for(&self, id: &str) -> Arc<ChatSession> {
        let key = SessionKey::derive(id);
        if let Some(session) = self.read_sessions().get(&key) {
            // Touched under the read lock so a concurrent sweep sees it
            session.touch();
            return Arc::clone(session);
        }

        let session = ChatSession::new(
            key.clone(),
            self.config.model.as_str(),
            self.config.context_size,
            Arc::clone(&self.gateway),
        )
        .with_model_timeout(self.config.model_timeout);

        match self.store.load(&key).await {
            Ok(messages) if !messages.is_empty() => {
                debug!(session = %key.short(), "Restored {} message(s)", messages.len());
                session.set_history(messages);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(session = %key.short(), error = %e, "Failed to load history; starting empty");
            }
        }

        let session = Arc::new(session);
        let winner = {
            let mut sessions = self.write_sessions();
            Arc::clone(sessions.entry(key).or_insert_with(|| Arc::clone(&session)))
        };

        // Another turn may have created the session while we were loading
        if Arc::ptr_eq(&winner, &session) {
            info!(session = %winner.key().short(), "Session created");
            self.conversation_logger.log(ConversationEvent::new(
                "session_created",
                json!({
                    "session": winner.key().as_str(),
                    "restored": winner.history().len(),
                }),
            ));
        }
        winner
    }

    /// Run one sweep tick: evict idle sessions, store the rest.
    pub async fn sweep(&self) -> SweepReport {
        let now = Instant::now();
        let lifetime = self.config.chat_lifetime;

        let (expired, mut active): (Vec<_>, Vec<_>) = self
            .read_sessions()
            .values()
            .cloned()
            .partition(|session| is_expired(session, now, lifetime));

        let mut report = SweepReport::default();

        let mut removed = Vec::with_capacity(expired.len());
        if !expired.is_empty() {
            let mut sessions = self.write_sessions();
            for session in expired {
                // Only remove the exact session judged idle
                let current = sessions
                    .get(session.key())
                    .is_some_and(|current| Arc::ptr_eq(current, &session));
                if !current {
                    continue;
                }
                // Used again since the partition
                if !is_expired(&session, Instant::now(), lifetime) {
                    active.push(session);
                    continue;
                }
                sessions.remove(session.key());
                removed.push(session);
            }
        }

        report.expired = removed.len();
        for session in &removed {
            info!(session = %session.key().short(), "Session expired");
            self.conversation_logger.log(ConversationEvent::new(
                "session_expired",
                json!({
                    "session": session.key().as_str(),
                    "idle_secs": session.idle_for(now).as_secs(),
                }),
            ));
        }

        let (persisted, failed) = self.persist(&active).await;
        report.persisted = persisted;
        report.failed = failed;

        debug!(
            expired = report.expired,
            persisted = report.persisted,
            failed = report.failed,
            "Sweep finished"
        );
        report
    }

    /// Store a snapshot of every live session once.
    pub async fn persist_all(&self) -> SweepReport {
        let sessions: Vec<_> = self.read_sessions().values().cloned().collect();
        let (persisted, failed) = self.persist(&sessions).await;
        SweepReport {
            expired: 0,
            persisted,
            failed,
        }
    }

    async fn persist(&self, sessions: &[Arc<ChatSession>]) -> (usize, usize) {
        let snapshots: Vec<(SessionKey, Vec<Message>)> = sessions
            .iter()
            .map(|session| (session.key().clone(), session.history()))
            .collect();

        let results = join_all(
            snapshots
                .iter()
                .map(|(key, messages)| self.store.store(key, messages)),
        )
        .await;

        let mut persisted = 0;
        let mut failed = 0;
        for ((key, _), result) in snapshots.iter().zip(results) {
            match result {
                Ok(()) => persisted += 1,
                Err(e) => {
                    failed += 1;
                    warn!(session = %key.short(), error = %e, "Failed to store history");
                }
            }
        }
        (persisted, failed)
    }

    /// Spawn the periodic sweep.
    ///
    /// The first tick fires one `save_interval` after start. Shutting down the
    /// returned handle stops the loop and persists every live session once.
    pub fn start_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let registry = Arc::clone(self);
        let token = CancellationToken::new();
        let cancel = token.clone();
        let period = self.config.save_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        registry.sweep().await;
                    }
                }
            }

            let report = registry.persist_all().await;
            info!(
                persisted = report.persisted,
                failed = report.failed,
                "Sweeper stopped"
            );
        });

        SweeperHandle { token, handle }
    }
}

/// Handle to a running sweeper task.
pub struct SweeperHandle {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the final persist to finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            warn!("Sweeper task join error: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Idle longer than `lifetime` and not in the middle of a turn.
fn is_expired(session: &ChatSession, now: Instant, lifetime: Duration) -> bool {
    !session.is_busy() && session.idle_for(now) > lifetime
}
