//! Climate API Core Library
//!
//! Shared pieces for the climate observation service:
//! - Configuration file discovery (XDG-compliant)
//! - TOML configuration loading
//! - Service defaults

mod config;

pub use config::{find_config_file, load_config, ConfigSource};

/// Application name used for XDG paths
pub const APP_NAME: &str = "climate-api";

/// Config filename searched for in the standard locations
pub const CONFIG_FILE_NAME: &str = "climate-api.toml";

/// Environment variable holding an explicit config file path
pub const CONFIG_ENV_VAR: &str = "CLIMATE_API_CONFIG";

/// Default API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default connection string for the observation dataset
pub const DEFAULT_DATABASE_URL: &str = "sqlite:Resources/hawaii.sqlite";
