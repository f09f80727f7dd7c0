//! Feedback handlers.

use crate::{
    core::feedback,
    entities::feedback::Model as FeedbackModel,
    errors::Result,
    web::{AppState, ApiJson, CurrentUser},
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Body of `POST /feedback`
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    /// Free-form feedback
    pub text: String,
}

/// Lists feedback, newest first.
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<FeedbackModel>>> {
    Ok(Json(feedback::list_feedback(&state.database).await?))
}

/// Stores a piece of feedback.
pub async fn submit(
    State(state): State<AppState>,
    _user: CurrentUser,
    ApiJson(form): ApiJson<FeedbackForm>,
) -> Result<(StatusCode, Json<FeedbackModel>)> {
    let feedback = feedback::submit_feedback(&state.database, &form.text).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}
