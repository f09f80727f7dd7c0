//! Unified error type for the service.
//!
//! Business logic in [`crate::core`] returns these variants directly; the web
//! layer turns them into JSON responses (see [`crate::web::error`]).

use thiserror::Error;

/// Every failure the service can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("Invalid price: {price} (must be a non-negative number)")]
    InvalidPrice { price: f64 },

    #[error("Invalid stock: {stock} (must not be negative)")]
    InvalidStock { stock: i32 },

    #[error("Invalid quantity {quantity} for product {product_id} (must be positive)")]
    InvalidQuantity { product_id: i64, quantity: i32 },

    #[error("Invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("Checkout requires at least one item")]
    EmptyCheckout,

    #[error("Product not found: {id}")]
    ProductNotFound { id: i64 },

    #[error(
        "Insufficient stock for product {product_id}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        product_id: i64,
        available: i32,
        requested: i32,
    },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: i64 },

    #[error("User already exists: {username}")]
    UserAlreadyExists { username: String },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Password hashing error: {message}")]
    PasswordHash { message: String },

    #[error("Token error: {message}")]
    Token { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::Unauthorized`] with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::PasswordHash {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
