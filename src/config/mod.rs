/// Service settings loaded from config.toml
pub mod app;

/// Database configuration and connection management
pub mod database;

/// Bootstrap account configuration from environment variables
pub mod users;

pub use app::{AppConfig, AuthConfig, DashboardConfig, ProductSeed, ServerConfig};
