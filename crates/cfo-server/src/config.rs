use anyhow::Context;
use cfo_common::types::AlertRule;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            cors_allowed_origins: Vec::new(),
            alert: AlertConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Seed the built-in rule set at startup
    #[serde(default = "default_true")]
    pub load_default_rules: bool,
    /// Optional JSON file with extra rules, applied after the built-ins
    #[serde(default)]
    pub rules_seed: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            load_default_rules: default_true(),
            rules_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub email_enabled: bool,
    #[serde(default = "default_true")]
    pub push_enabled: bool,
    #[serde(default = "default_delivery_log_capacity")]
    pub delivery_log_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            email_enabled: default_true(),
            push_enabled: default_true(),
            delivery_log_capacity: default_delivery_log_capacity(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_delivery_log_capacity() -> usize {
    cfo_notify::manager::DEFAULT_DELIVERY_LOG_CAPACITY
}

// ---- Rules seed file ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesSeedFile {
    #[serde(default)]
    pub rules: Vec<AlertRule>,
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{path}'"))?;
        Ok(config)
    }

    /// Loads `path` when given. Without an explicit path the default
    /// location is tried and a missing file falls back to defaults.
    pub fn load_or_default(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => {
                tracing::warn!(
                    path = DEFAULT_CONFIG_PATH,
                    "Config file not found, using defaults"
                );
                Ok(Self::default())
            }
        }
    }
}
