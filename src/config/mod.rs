//! Application configuration

pub mod loader;
pub mod types;

pub use loader::{load_config, load_from_env, resolve_config};
pub use types::{AppConfig, AppSettings, RiskStoreConfig, ServerConfig};
