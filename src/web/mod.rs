//! Web layer - HTTP interface to the inventory service.
//!
//! This module provides the axum router, the JSON handlers, bearer-token
//! authentication and the mapping from [`crate::errors::Error`] to HTTP responses.

/// Bearer token issuing, validation and the `CurrentUser` extractor
pub mod auth;
/// Error responses and the JSON body extractor
pub mod error;
/// Request handlers (auth, inventory, billing, dashboard, feedback)
pub mod handlers;

pub use auth::{CurrentUser, TokenService};
pub use error::ApiJson;

use crate::{config::AppConfig, errors::Result};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::{auth as auth_handlers, billing, dashboard, feedback, inventory};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared state available to all handlers.
/// This structure holds the database connection, the loaded configuration and the
/// token service. Every field is reference counted, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub database: Arc<DatabaseConnection>,
    /// Loaded service configuration
    pub config: Arc<AppConfig>,
    /// Token issuing and validation
    pub tokens: TokenService,
}

impl AppState {
    /// Creates a new `AppState`.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: Arc<AppConfig>, tokens: TokenService) -> Self {
        Self {
            database: Arc::new(database),
            config,
            tokens,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Public routes
        .route("/register", post(auth_handlers::register))
        .route("/signup", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        // Protected routes - every handler below takes a CurrentUser
        .route("/logout", post(auth_handlers::logout))
        .route("/inventory", get(inventory::list).post(inventory::save))
        .route("/inventory/{id}", get(inventory::get))
        .route(
            "/delete/{id}",
            post(inventory::delete).delete(inventory::delete),
        )
        .route("/billing", get(billing::view).post(billing::checkout))
        .route("/billing/{transaction_id}", get(billing::get_transaction))
        .route("/dashboard", get(dashboard::show))
        .route("/feedback", get(feedback::list).post(feedback::submit))
        // JSON API used by the point-of-sale client
        .route("/api/inventory", get(inventory::list))
        .route("/api/checkout", post(billing::checkout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the router on `bind` until Ctrl-C.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
