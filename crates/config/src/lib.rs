//! Configuration management for the lead pipeline
//!
//! Supports loading configuration from:
//! - TOML/YAML files
//! - Environment variables (LEADFLOW_ prefix)
//! - Runtime overrides
//!
//! All heuristic analytics constants (funnel drop thresholds, insight
//! rule thresholds, daily activation capacity) live here as tunable
//! configuration; the defaults reproduce the shipped policy values.

pub mod settings;
pub mod thresholds;

pub use settings::{
    load_settings, ActivationConfig, ProspectingConfig, ServerConfig, Settings,
};
pub use thresholds::{FunnelThresholds, InsightThresholds};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
