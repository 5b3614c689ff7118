//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters and hosting
//! programs implement.

pub mod conversation_logger;
pub mod history_store;
pub mod llm_gateway;
pub mod response_sink;
pub mod tool_executor;
