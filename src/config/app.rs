//! Service configuration loading from config.toml
//!
//! Every section is optional; a missing file or a missing key falls back to
//! the defaults below. The `[[products]]` list seeds the catalog on first run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "DOKAN_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Token issuing settings
    pub auth: AuthConfig,
    /// Dashboard and forecast settings
    pub dashboard: DashboardConfig,
    /// Products inserted when the catalog is empty
    pub products: Vec<ProductSeed>,
}

/// `[server]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// `[auth]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of an issued bearer token
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: 24 * 60,
        }
    }
}

/// `[dashboard]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of days the sales forecast covers
    pub forecast_days: u32,
    /// Products at or below this stock level are flagged
    pub low_stock_threshold: i32,
    /// Products expiring within this many days are flagged
    pub expiry_window_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            forecast_days: 7,
            low_stock_threshold: 10,
            expiry_window_days: 30,
        }
    }
}

/// One `[[products]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    /// Product name
    pub name: String,
    /// Product category
    pub category: String,
    /// Initial stock
    #[serde(default)]
    pub stock: i32,
    /// Unit price
    pub price: f64,
    /// Expiry date as `YYYY-MM-DD`, empty for none
    #[serde(default)]
    pub expiry_date: String,
    /// Supplier name
    #[serde(default)]
    pub supplier: String,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.as_ref().display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a field has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `$DOKAN_CONFIG`, or `./config.toml`.
///
/// A missing file is not an error: the defaults are used instead.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::warn!(path = %path, "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }
    tracing::debug!(path = %path, "Loading configuration");
    load_config(path)
}
