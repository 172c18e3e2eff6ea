//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AppConfig, AppSettings, RiskStoreConfig, ServerConfig};
use crate::common::errors::{EngineError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_, nested with `__`)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| EngineError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| EngineError::Configuration(e.to_string()))
}

/// Resolve the configuration for one run
///
/// An existing file is layered with `APP__` variables by [`load_config`];
/// without a file, plain `OPTION_RISK_*` variables are read by [`load_from_env`].
pub fn resolve_config(config_path: &str) -> Result<AppConfig> {
    if Path::new(config_path).exists() {
        load_config(Some(config_path))
    } else {
        load_from_env()
    }
}

/// Load configuration from plain `OPTION_RISK_*` environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let defaults = AppConfig::default();

    let port = match std::env::var("OPTION_RISK_PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| EngineError::Configuration(format!("Invalid OPTION_RISK_PORT: {}", raw)))?,
        Err(_) => defaults.server.port,
    };

    let persist = match std::env::var("OPTION_RISK_PERSIST") {
        Ok(raw) => raw.parse().map_err(|_| {
            EngineError::Configuration(format!("Invalid OPTION_RISK_PERSIST: {}", raw))
        })?,
        Err(_) => defaults.risk.persist,
    };

    Ok(AppConfig {
        server: ServerConfig {
            host: std::env::var("OPTION_RISK_HOST").unwrap_or(defaults.server.host),
            port,
        },
        risk: RiskStoreConfig {
            config_file: std::env::var("OPTION_RISK_CONFIG_FILE")
                .unwrap_or(defaults.risk.config_file),
            persist,
        },
        settings: AppSettings {
            log_level: std::env::var("OPTION_RISK_LOG_LEVEL")
                .unwrap_or(defaults.settings.log_level),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_from_toml_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 7070\n\n[risk]\nconfig_file = \"/tmp/risk.json\"\npersist = false"
        )
        .unwrap();

        let config = load_config(file.path().to_str()).unwrap();

        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.risk.config_file, "/tmp/risk.json");
        assert!(!config.risk.persist);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Some("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.risk.config_file, "risk_config.json");
    }

    #[test]
    fn test_resolve_prefers_existing_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[settings]\nlog_level = \"debug\"").unwrap();

        let config = resolve_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.settings.log_level, "debug");
    }

    // the only test that touches OPTION_RISK_* variables
    #[test]
    fn test_plain_environment_without_file() {
        std::env::set_var("OPTION_RISK_PORT", "8181");
        std::env::set_var("OPTION_RISK_PERSIST", "false");
        std::env::set_var("OPTION_RISK_CONFIG_FILE", "/var/lib/risk.json");

        let config = resolve_config("/definitely/not/here.toml").unwrap();
        assert_eq!(config.server.port, 8181);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.risk.persist);
        assert_eq!(config.risk.config_file, "/var/lib/risk.json");

        std::env::set_var("OPTION_RISK_PORT", "not-a-port");
        let err = load_from_env().unwrap_err();
        assert!(matches!(err, EngineError::Configuration(ref m) if m.contains("OPTION_RISK_PORT")));

        for key in ["OPTION_RISK_PORT", "OPTION_RISK_PERSIST", "OPTION_RISK_CONFIG_FILE"] {
            std::env::remove_var(key);
        }
    }
}
