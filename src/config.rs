//! Configuration module for luaflow.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides (applied by the caller)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `LUAFLOW_` and use double
//! underscores to separate nested levels:
//! - `LUAFLOW_OUTPUT__PATH=chart.md` sets `output.path`
//! - `LUAFLOW_OUTPUT__FENCED=false` sets `output.fenced`
//! - `LUAFLOW_FLOWCHART__DIRECTION=LR` sets `flowchart.direction`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FlowError, FlowResult};
use crate::flowchart::{BuildOptions, Direction, OutputFormat, RenderOptions};

/// Directory holding the settings file, searched upward from the current directory.
pub const CONFIG_DIR: &str = ".luaflow";
pub const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "LUAFLOW_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Flowchart construction settings
    #[serde(default)]
    pub flowchart: FlowchartConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// File the rendered diagram is written to
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// `mermaid` or `json`
    #[serde(default)]
    pub format: OutputFormat,

    /// Wrap Mermaid output in a ```mermaid code fence
    #[serde(default = "default_true")]
    pub fenced: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FlowchartConfig {
    /// Mermaid graph direction (TD, TB, BT, LR, RL)
    #[serde(default)]
    pub direction: Direction,

    /// Prefix for generated node ids
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Draw a separate condition node for each `elseif` clause.
    /// When false only the first `if` condition is shown.
    #[serde(default)]
    pub label_elseif_conditions: bool,
}

/// Logging configuration.
///
/// ```toml
/// [logging]
/// default = "warn"
///
/// [logging.modules]
/// luaflow = "debug"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default level for all targets
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides
    #[serde(default)]
    pub modules: IndexMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_output_path() -> PathBuf {
    PathBuf::from("flowchart.md")
}
fn default_true() -> bool {
    true
}
fn default_id_prefix() -> String {
    "n".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            output: OutputConfig::default(),
            flowchart: FlowchartConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::default(),
            fenced: true,
        }
    }
}

impl Default for FlowchartConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            id_prefix: default_id_prefix(),
            label_elseif_conditions: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources, using the workspace settings file if one exists.
    pub fn load() -> FlowResult<Self> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
        Self::load_from(config_path)
    }

    /// Load configuration from a specific file (which may not exist), then the environment.
    pub fn load_from(path: impl AsRef<Path>) -> FlowResult<Self> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nesting levels; single underscores stay in field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)?;
        settings.validate()?;

        tracing::debug!("[config] loaded settings (config file: {})", path.as_ref().display());
        Ok(settings)
    }

    /// Find the settings file by looking for a `.luaflow` directory from the
    /// current directory up to the filesystem root.
    pub fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(CONFIG_FILE));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> FlowResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FlowError::io(parent, e))?;
        }

        let toml_string = self.to_toml()?;
        std::fs::write(path, toml_string).map_err(|e| FlowError::io(path, e))?;

        Ok(())
    }

    pub fn to_toml(&self) -> FlowResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| FlowError::InvalidSettings(format!("Cannot serialize settings: {e}")))
    }

    /// Create a default settings file at `.luaflow/settings.toml`.
    pub fn init_config_file(force: bool) -> FlowResult<PathBuf> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err(FlowError::InvalidSettings(format!(
                "Configuration file already exists at {}. Use --force to overwrite",
                config_path.display()
            )));
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }

    /// Reject values that would produce broken diagram markup.
    pub fn validate(&self) -> FlowResult<()> {
        let prefix = &self.flowchart.id_prefix;
        if !is_valid_id_prefix(prefix) {
            return Err(FlowError::InvalidSettings(format!(
                "Invalid flowchart.id_prefix '{prefix}': expected a letter or '_' followed by letters, digits or '_'"
            )));
        }
        Ok(())
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            id_prefix: self.flowchart.id_prefix.clone(),
            label_elseif_conditions: self.flowchart.label_elseif_conditions,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.output.format,
            direction: self.flowchart.direction,
            fenced: self.output.fenced,
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_valid_id_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
