//! HTTP mapping of [`Error`].
//!
//! Client errors carry their message; server errors are logged and answered with a
//! generic message so that database details never leak.

use crate::errors::Error;
use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code
    pub error: &'static str,
    /// Human-readable explanation
    pub message: String,
}

impl Error {
    /// HTTP status for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. }
            | Self::InvalidPrice { .. }
            | Self::InvalidStock { .. }
            | Self::InvalidQuantity { .. }
            | Self::InvalidDate { .. }
            | Self::EmptyCheckout => StatusCode::BAD_REQUEST,

            Self::InvalidCredentials | Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,

            Self::ProductNotFound { .. } | Self::TransactionNotFound { .. } => {
                StatusCode::NOT_FOUND
            }

            Self::UserAlreadyExists { .. } | Self::InsufficientStock { .. } => {
                StatusCode::CONFLICT
            }

            Self::Config { .. }
            | Self::PasswordHash { .. }
            | Self::Token { .. }
            | Self::Database(_)
            | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for this error
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "invalid_input",
            Self::InvalidPrice { .. } => "invalid_price",
            Self::InvalidStock { .. } => "invalid_stock",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::InvalidDate { .. } => "invalid_date",
            Self::EmptyCheckout => "empty_checkout",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthorized { .. } => "unauthorized",
            Self::ProductNotFound { .. } => "product_not_found",
            Self::TransactionNotFound { .. } => "transaction_not_found",
            Self::UserAlreadyExists { .. } => "user_exists",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::Config { .. }
            | Self::PasswordHash { .. }
            | Self::Token { .. }
            | Self::Database(_)
            | Self::Io(_) => "internal_error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejection is a JSON [`ErrorBody`] instead of plain text.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::EmptyCheckout.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InvalidPrice { price: -1.0 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::ProductNotFound { id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::InsufficientStock {
                product_id: 1,
                available: 0,
                requested: 1
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::UserAlreadyExists {
                username: "a".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::Database(sea_orm::DbErr::Custom("x".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_server_error_message_is_hidden() {
        let response =
            Error::Database(sea_orm::DbErr::Custom("secret detail".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("internal_error"));
        assert!(!text.contains("secret detail"));
    }
}
