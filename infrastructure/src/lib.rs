//! Infrastructure layer for colloquy
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: history stores, the tool registry, configuration
//! file loading and logging.

pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod storage;
pub mod tools;

// Re-export commonly used types
pub use bootstrap::build_registry;
pub use config::{
    ConfigError, ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig,
    FileSessionConfig, FileStorageConfig, StorageBackend,
};
pub use logging::{JsonlConversationLogger, init_tracing};
pub use storage::{FileHistoryStore, MemoryHistoryStore};
pub use tools::{BuiltinProvider, RegistryStats, ToolRegistry};
