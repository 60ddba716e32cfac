//! Client Configuration
//!
//! Centralized configuration loading for the learning client, backed by a
//! TOML file at `$XDG_CONFIG_HOME/infou/client.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables (`INFOU_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! timeout_ms = 10000
//! connect_timeout_ms = 5000
//! log_requests = true
//!
//! [wizard]
//! steps = ["welcome", "level", "topic", "learning-path", "summary"]
//!
//! [reader]
//! content_style = "concise"
//! word_count = 300
//!
//! [generation]
//! learning_path_items = 5
//!
//! [ui]
//! toast_duration_ms = 3000
//! persist_selection = true
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wizard::WizardFlow;

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[api]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Backend base URL
    pub base_url: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: Option<u64>,
    /// Log every request and response at debug level
    pub log_requests: Option<bool>,
    /// Opaque bearer token attached to reader-specific calls
    pub auth_token: Option<String>,
    /// User id for the progress view
    pub user_id: Option<String>,
}

/// `[wizard]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardToml {
    /// Step order, by step name
    pub steps: Option<Vec<String>>,
}

/// `[reader]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderToml {
    /// Style requested when generating an article
    pub content_style: Option<String>,
    /// Target length requested when generating an article
    pub word_count: Option<u32>,
}

/// `[generation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationToml {
    /// Curriculum items requested when generating a learning path
    pub learning_path_items: Option<u32>,
}

/// `[ui]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToml {
    /// How long toasts stay visible
    pub toast_duration_ms: Option<u64>,
    /// Remember the last topic and level between runs
    pub persist_selection: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfouToml {
    /// API section
    pub api: ApiToml,
    /// Wizard section
    pub wizard: WizardToml,
    /// Reader section
    pub reader: ReaderToml,
    /// Generation section
    pub generation: GenerationToml,
    /// UI section
    pub ui: UiToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Connection settings for the learning API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL (e.g. `http://localhost:8000/api`)
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Log every request and response
    pub log_requests: bool,
    /// Opaque bearer token
    pub auth_token: Option<String>,
    /// User id for the progress view
    pub user_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
            log_requests: cfg!(debug_assertions),
            auth_token: None,
            user_id: None,
        }
    }
}

/// Article generation settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Requested writing style
    pub content_style: String,
    /// Requested length
    pub word_count: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            content_style: "concise".to_string(),
            word_count: 300,
        }
    }
}

/// Resolved client configuration
#[derive(Clone, Debug)]
pub struct InfouConfig {
    /// API connection
    pub api: ApiConfig,
    /// Wizard step order
    pub wizard_flow: WizardFlow,
    /// Article generation
    pub reader: ReaderConfig,
    /// Curriculum items requested when generating a learning path
    pub learning_path_items: u32,
    /// Toast lifetime in milliseconds
    pub toast_duration_ms: u64,
    /// Whether the selection is persisted between runs
    pub persist_selection: bool,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Source of configuration values
    source: ConfigSource,
}

impl Default for InfouConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            wizard_flow: WizardFlow::default(),
            reader: ReaderConfig::default(),
            learning_path_items: 5,
            toast_duration_ms: 3_000,
            persist_selection: true,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl InfouConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/infou/client.toml`, typically
/// `~/.config/infou/client.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("infou").join("client.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed or holds
/// invalid values. A missing config file is not an error.
pub fn load_config() -> Result<InfouConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<InfouConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<InfouConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = InfouConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: InfouToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    validate(&config)?;

    Ok(config)
}

fn apply_toml_config(config: &mut InfouConfig, toml: &InfouToml) -> Result<(), ConfigError> {
    // API
    if let Some(ref url) = toml.api.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(ms) = toml.api.timeout_ms {
        config.api.timeout_ms = ms;
    }
    if let Some(ms) = toml.api.connect_timeout_ms {
        config.api.connect_timeout_ms = ms;
    }
    if let Some(enabled) = toml.api.log_requests {
        config.api.log_requests = enabled;
    }
    if toml.api.auth_token.is_some() {
        config.api.auth_token = toml.api.auth_token.clone();
    }
    if toml.api.user_id.is_some() {
        config.api.user_id = toml.api.user_id.clone();
    }

    // Wizard
    if let Some(ref steps) = toml.wizard.steps {
        config.wizard_flow = WizardFlow::from_names(steps)
            .map_err(|e| ConfigError::ValidationError(format!("wizard.steps: {e}")))?;
    }

    // Reader
    if let Some(ref style) = toml.reader.content_style {
        config.reader.content_style = style.clone();
    }
    if let Some(count) = toml.reader.word_count {
        config.reader.word_count = count;
    }

    // Generation
    if let Some(items) = toml.generation.learning_path_items {
        config.learning_path_items = items;
    }

    // UI
    if let Some(ms) = toml.ui.toast_duration_ms {
        config.toast_duration_ms = ms;
    }
    if let Some(enabled) = toml.ui.persist_selection {
        config.persist_selection = enabled;
    }

    Ok(())
}

fn apply_env_config<F>(config: &mut InfouConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    // INFOU_ENV=production turns request logging off unless asked for below
    if let Some(mode) = env("INFOU_ENV") {
        config.api.log_requests = !mode.eq_ignore_ascii_case("production");
        config.source = ConfigSource::Env;
    }
    if let Some(url) = env("INFOU_API_URL") {
        if !url.trim().is_empty() {
            config.api.base_url = url;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(timeout) = env("INFOU_API_TIMEOUT") {
        if let Ok(ms) = timeout.parse::<u64>() {
            config.api.timeout_ms = ms;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(enabled) = env("INFOU_LOG_REQUESTS") {
        config.api.log_requests = enabled != "0" && !enabled.eq_ignore_ascii_case("false");
        config.source = ConfigSource::Env;
    }
    if let Some(token) = env("INFOU_AUTH_TOKEN") {
        config.api.auth_token = Some(token);
        config.source = ConfigSource::Env;
    }
    if let Some(user) = env("INFOU_USER_ID") {
        config.api.user_id = Some(user);
        config.source = ConfigSource::Env;
    }
}

fn validate(config: &InfouConfig) -> Result<(), ConfigError> {
    let url = config.api.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must be an http(s) URL, got {url:?}"
        )));
    }
    if config.api.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_ms must be greater than zero".to_string(),
        ));
    }
    if config.reader.word_count == 0 {
        return Err(ConfigError::ValidationError(
            "reader.word_count must be greater than zero".to_string(),
        ));
    }
    if config.learning_path_items == 0 {
        return Err(ConfigError::ValidationError(
            "generation.learning_path_items must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Base URL override
    pub api_url: Option<String>,
    /// Request timeout override (milliseconds)
    pub timeout_ms: Option<u64>,
    /// Request logging override
    pub log_requests: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override
    #[must_use]
    pub fn with_api_url(mut self, url: String) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Set request logging override
    #[must_use]
    pub fn with_log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = Some(enabled);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut InfouConfig) {
        if self.api_url.is_some() || self.timeout_ms.is_some() || self.log_requests.is_some() {
            config.source = ConfigSource::Cli;
        }
        if let Some(ref url) = self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.api.timeout_ms = ms;
        }
        if let Some(enabled) = self.log_requests {
            config.api.log_requests = enabled;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
