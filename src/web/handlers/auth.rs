//! Authentication handlers - register, login and logout.

use crate::{
    core::user,
    entities::user::Model as UserModel,
    errors::Result,
    web::{AppState, ApiJson, CurrentUser},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `/register`, `/signup` and `/login`
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Plain-text password
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    /// User id
    pub id: i64,
    /// Login name
    pub username: String,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl From<UserModel> for UserInfo {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
    /// Always `"Bearer"`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserInfo,
}

/// Creates an account.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<(StatusCode, Json<UserInfo>)> {
    let user = user::register_user(
        &state.database,
        &credentials.username,
        &credentials.password,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Checks credentials and issues a token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<LoginResponse>> {
    let user = user::authenticate(
        &state.database,
        &credentials.username,
        &credentials.password,
    )
    .await?;
    let token = state.tokens.issue(&user)?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.ttl_seconds(),
        user: user.into(),
    }))
}

/// Revokes the token used for this request.
pub async fn logout(State(state): State<AppState>, current: CurrentUser) -> StatusCode {
    state.tokens.revoke(&current.claims);
    tracing::info!(user_id = current.id, username = %current.username, "User logged out");
    StatusCode::NO_CONTENT
}
