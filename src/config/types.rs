//! Configuration types

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Where the risk configuration is persisted
    #[serde(default)]
    pub risk: RiskStoreConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Risk configuration persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskStoreConfig {
    /// Path of the JSON file holding capital and risk percentage
    #[serde(default = "default_config_file")]
    pub config_file: String,
    /// Persist changes to `config_file`; when false the configuration lives in memory
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl Default for RiskStoreConfig {
    fn default() -> Self {
        Self {
            config_file: default_config_file(),
            persist: default_persist(),
        }
    }
}

fn default_config_file() -> String {
    "risk_config.json".to_string()
}

fn default_persist() -> bool {
    true
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
