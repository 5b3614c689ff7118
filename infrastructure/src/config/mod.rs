//! Configuration file loading for colloquy
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COLLOQUY_*` environment variables
//! 2. Explicitly passed config file
//! 3. Project root: `./colloquy.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/colloquy/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileSessionConfig, FileStorageConfig,
    StorageBackend,
};
pub use loader::{ConfigError, ConfigLoader};
