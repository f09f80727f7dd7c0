//! Dashboard handler.

use crate::{
    core::dashboard::{DashboardReport, build_dashboard},
    errors::Result,
    web::{AppState, CurrentUser},
};
use axum::{Json, extract::State};

/// Builds the dashboard report.
pub async fn show(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<DashboardReport>> {
    Ok(Json(
        build_dashboard(&state.database, &state.config.dashboard).await?,
    ))
}
