//! Configuration loading and typed config structures for Smithy.
//!
//! The canonical configuration lives in `smithy-config.yaml` at the project
//! root. Every field has a default, so an empty document (or a missing file,
//! at the engine's discretion) yields a working configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `smithy-config.yaml`. Sections unknown to the
/// core (such as the engine's `run` section) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SmithyConfig {
    /// Agent reach and search distances.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Recipe resolver behaviour.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Furnace handling.
    #[serde(default)]
    pub smelting: SmeltingConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SmithyConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Agent reach and search distances, in blocks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentConfig {
    /// Distance within which a workstation or furnace counts as usable and a
    /// block can be dug without moving.
    #[serde(default = "default_interaction_range")]
    pub interaction_range: u32,

    /// Radius searched when looking for blocks to collect.
    #[serde(default = "default_search_radius")]
    pub search_radius: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interaction_range: default_interaction_range(),
            search_radius: default_search_radius(),
        }
    }
}

/// Recipe resolver behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolverConfig {
    /// Item name of the crafting workstation.
    #[serde(default = "default_workstation")]
    pub workstation: String,

    /// Mine raw resources (items with no recipe but a dropping block) instead
    /// of failing with `NoRecipe`.
    #[serde(default = "default_true")]
    pub gather_raw: bool,

    /// Dig a workstation placed during a resolution back into the inventory
    /// once the resolution succeeds.
    #[serde(default = "default_true")]
    pub reclaim_workstation: bool,

    /// Maximum ingredient closure passes per recipe.
    #[serde(default = "default_max_closure_passes")]
    pub max_closure_passes: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            workstation: default_workstation(),
            gather_raw: default_true(),
            reclaim_workstation: default_true(),
            max_closure_passes: default_max_closure_passes(),
        }
    }
}

/// Furnace handling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmeltingConfig {
    /// Item name of the furnace.
    #[serde(default = "default_furnace")]
    pub furnace: String,

    /// Completion wait granted per smelted item, in milliseconds.
    #[serde(default = "default_timeout_per_item_ms")]
    pub timeout_per_item_ms: u64,
}

impl Default for SmeltingConfig {
    fn default() -> Self {
        Self {
            furnace: default_furnace(),
            timeout_per_item_ms: default_timeout_per_item_ms(),
        }
    }
}

/// Log output settings, applied by the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_interaction_range() -> u32 {
    4
}

const fn default_search_radius() -> u32 {
    64
}

fn default_workstation() -> String {
    "crafting_table".to_owned()
}

const fn default_max_closure_passes() -> u32 {
    3
}

fn default_furnace() -> String {
    "furnace".to_owned()
}

const fn default_timeout_per_item_ms() -> u64 {
    15_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
