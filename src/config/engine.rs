//! Engine configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_MAX_IMPORT_DEPTH,
};
use crate::module::EvalContext;

/// How `short eval` prints resolved modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// YAML documents separated by `---`
    #[default]
    Yaml,
    /// A single JSON array
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Contents of `config.toml`.
///
/// Unknown keys are rejected so that typos do not silently fall back to
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Keep decoded module files in memory while evaluating
    pub cache_documents: bool,

    /// Maximum import nesting depth
    pub max_import_depth: usize,

    /// Default output format of `short eval`
    pub output: OutputFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_documents: true,
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
            output: OutputFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Load the configuration, honoring an explicit path first.
    ///
    /// An explicit path (argument or `SHORT_CONFIG`) must exist; the default
    /// location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Self::load_from(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                tracing::debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load the configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// The platform-specific default location, if a home directory exists.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()?.join("short")
        } else {
            dirs::home_dir()?.join(CONFIG_DIR_NAME)
        };
        Some(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Transfer the engine options to `ctx`.
    #[must_use]
    pub fn apply<T>(&self, ctx: EvalContext<T>) -> EvalContext<T> {
        ctx.with_document_cache(self.cache_documents).with_max_import_depth(self.max_import_depth)
    }
}
