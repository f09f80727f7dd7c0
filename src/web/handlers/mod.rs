//! HTTP handlers organized by area.

/// Registration, login and logout
pub mod auth;

/// Checkout and transaction history
pub mod billing;

/// Dashboard report
pub mod dashboard;

/// Feedback submission and listing
pub mod feedback;

/// Catalog management
pub mod inventory;

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
