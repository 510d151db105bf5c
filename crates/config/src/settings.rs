//! Top-level settings and the file/env loader

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::thresholds::{FunnelThresholds, InsightThresholds};
use crate::ConfigError;

/// Top-level settings for the lead pipeline service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Funnel drop-point thresholds
    #[serde(default)]
    pub funnel: FunnelThresholds,

    /// Insight rule thresholds
    #[serde(default)]
    pub insights: InsightThresholds,

    /// Activation quota configuration
    #[serde(default)]
    pub activation: ActivationConfig,

    /// Prospecting dispatch configuration
    #[serde(default)]
    pub prospecting: ProspectingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS origin checks
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (empty = localhost only)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Activation quota configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationConfig {
    /// Daily capacity used when a company has no prospecting profile
    #[serde(default = "default_daily_capacity")]
    pub default_daily_capacity: u32,
}

fn default_daily_capacity() -> u32 {
    10
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            default_daily_capacity: default_daily_capacity(),
        }
    }
}

/// Prospecting dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectingConfig {
    /// Leads dispatched per trigger
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Contact-automation webhook URL (unset = dispatch disabled)
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Outbound request timeout (seconds)
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_seconds: u64,
}

fn default_batch_size() -> usize {
    10
}
fn default_webhook_timeout() -> u64 {
    10
}

impl Default for ProspectingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            webhook_url: None,
            webhook_timeout_seconds: default_webhook_timeout(),
        }
    }
}

/// Load settings from an optional file plus LEADFLOW_ environment overrides
///
/// File format is inferred from the extension (toml/yaml). Missing file is
/// an error; `None` loads defaults + environment only.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("LEADFLOW")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    tracing::debug!(
        port = settings.server.port,
        prospecting_batch = settings.prospecting.batch_size,
        "settings loaded"
    );

    Ok(settings)
}
