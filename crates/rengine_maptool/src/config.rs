//! Tool Configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `REMTOOL_POINT_LIGHTS_MAX`, `REMTOOL_STRICT`,
//!    `REMTOOL_LOG_DIAGNOSTICS`
//! 2. Config file: `remtool.toml` in the working directory
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! point_lights_max = 32
//! strict = false          # exit with code 2 when any line was skipped
//! log_diagnostics = false # forward rejected lines to the log as well
//! ```

use std::path::{Path, PathBuf};

use rengine_map::{MapConfig, POINT_LIGHTS_MAX};
use serde::{Deserialize, Serialize};

use crate::ToolError;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "remtool.toml";

/// Complete tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Point light capacity used when loading and saving
    pub point_lights_max: usize,
    /// Treat skipped lines as a failure
    pub strict: bool,
    /// Forward rejected lines to the log in addition to stderr
    pub log_diagnostics: bool,
    /// Config file the values were read from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            point_lights_max: POINT_LIGHTS_MAX,
            strict: false,
            log_diagnostics: false,
            config_path: None,
        }
    }
}

impl ToolConfig {
    /// Load configuration from all sources
    ///
    /// A config file that exists but cannot be parsed is an error; a missing
    /// one is not.
    pub fn load() -> Result<Self, ToolError> {
        let mut config = Self::load_from_dir(Path::new("."))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults overridden by `remtool.toml` in `dir`, if present
    pub fn load_from_dir(dir: &Path) -> Result<Self, ToolError> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let config = Self::load_from_file(&path)?;
        log::info!("Loaded tool config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ToolError> {
        let content = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|source| ToolError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Override fields from environment variables
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("REMTOOL_POINT_LIGHTS_MAX") {
            match value.trim().parse() {
                Ok(max) => {
                    self.point_lights_max = max;
                    log::info!("Point light limit from env: {}", max);
                }
                Err(_) => log::warn!("Ignoring REMTOOL_POINT_LIGHTS_MAX={:?}", value),
            }
        }

        if let Some(value) = var("REMTOOL_STRICT") {
            self.strict = parse_flag(&value);
        }

        if let Some(value) = var("REMTOOL_LOG_DIAGNOSTICS") {
            self.log_diagnostics = parse_flag(&value);
        }
    }

    /// Loader configuration derived from the tool settings
    pub fn map_config(&self) -> MapConfig {
        MapConfig::default().with_point_lights_max(self.point_lights_max)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
