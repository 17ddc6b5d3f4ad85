//! Configuration primitives for Searchlens.
//!
//! Stored in a machine-readable TOML file located at:
//!   %APPDATA%/Searchlens/config/config.toml on Windows
//!   $XDG_DATA_HOME/Searchlens/config/config.toml on Linux
//!   ~/Library/Application Support/Searchlens/config/config.toml on macOS
//!
//! The config tracks provider credentials, assistant model settings, and
//! fetch defaults. Credential material can also arrive through the
//! `GOOGLE_APPLICATION_CREDENTIALS` and `ANTHROPIC_API_KEY` environment
//! variables, which take effect when the corresponding file entry is unset.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Search Console provider settings (credentials location).
    #[serde(default)]
    pub google: GoogleSettings,
    /// Assistant model settings (model name, token caps).
    #[serde(default)]
    pub assistant: AssistantSettings,
    /// Fetch defaults applied when a query does not specify them.
    #[serde(default)]
    pub fetch: FetchSettings,
}

/// Search Console credential discovery.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleSettings {
    /// Path to the service-account credentials JSON. Falls back to the
    /// `GOOGLE_APPLICATION_CREDENTIALS` environment variable when unset.
    #[serde(default)]
    pub credentials_path: Option<String>,
}

impl GoogleSettings {
    /// Resolves the credentials file, erroring when the configured or
    /// environment-supplied path does not exist on disk.
    pub fn credentials_file(&self) -> Result<PathBuf> {
        let candidate = match &self.credentials_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(
                env::var("GOOGLE_APPLICATION_CREDENTIALS")
                    .context("No Google credentials configured: set `google.credentials_path` in config.toml or the GOOGLE_APPLICATION_CREDENTIALS environment variable")?,
            ),
        };
        if !candidate.exists() {
            anyhow::bail!("Google credentials file does not exist: {:?}", candidate);
        }
        Ok(candidate)
    }
}

/// Assistant-side knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Model used for both command proposals and explanations.
    #[serde(default = "default_assistant_model")]
    pub model: String,
    /// Token cap for command proposals.
    #[serde(default = "default_command_max_tokens")]
    pub command_max_tokens: u32,
    /// Token cap for natural-language explanations.
    #[serde(default = "default_explanation_max_tokens")]
    pub explanation_max_tokens: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: default_assistant_model(),
            command_max_tokens: default_command_max_tokens(),
            explanation_max_tokens: default_explanation_max_tokens(),
        }
    }
}

fn default_assistant_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

const fn default_command_max_tokens() -> u32 {
    100
}

const fn default_explanation_max_tokens() -> u32 {
    300
}

/// Fetch defaults for analytics queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Row cap applied when the query carries no explicit limit.
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,
    /// Whether to keep paging until the provider is exhausted or the row
    /// cap is reached, instead of returning after a single page.
    #[serde(default = "default_fetch_all")]
    pub fetch_all: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            row_limit: default_row_limit(),
            fetch_all: default_fetch_all(),
        }
    }
}

const fn default_row_limit() -> usize {
    1000
}

const fn default_fetch_all() -> bool {
    false
}

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the root directory where Searchlens stores data.
///
/// Order of precedence:
/// 1. `SEARCHLENS_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("SEARCHLENS_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("Searchlens"))
}

/// Returns the config directory under the workspace root.
pub fn config_dir() -> Result<PathBuf> {
    let root = workspace_root()?;
    Ok(root.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}
