//! Configuration file loader with multi-source merging

use super::file_config::{ConfigValidationError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file name
const PROJECT_CONFIG: &str = "colloquy.toml";

/// Environment variable prefix; `__` separates nested keys
/// (e.g. `COLLOQUY_SESSION__MODEL`)
const ENV_PREFIX: &str = "COLLOQUY_";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigValidationError),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `COLLOQUY_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./colloquy.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/colloquy/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let project = PathBuf::from(PROJECT_CONFIG);
        Self::load_from(
            Self::global_config_path().as_deref(),
            Some(project.as_path()),
            config_path,
        )
    }

    /// Load from explicit global, project and override paths
    pub fn load_from(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, ConfigError> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: FileConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Render the default configuration as TOML, for seeding a config file
    pub fn render_defaults() -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&FileConfig::default())?)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/colloquy/config.toml if set, otherwise the
    /// platform config directory equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("colloquy").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG);
        path.exists().then_some(path)
    }
}
