//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs carrying the user id, username and a random token id (`jti`).
//! Logout records the `jti` in an in-memory revocation set until the token would have
//! expired anyway. Protected handlers take a [`CurrentUser`] argument; extraction fails
//! with [`Error::Unauthorized`] when the header is missing, malformed, expired or revoked.

use crate::{
    entities::user,
    errors::{Error, Result},
    web::AppState,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Minimum accepted length of `JWT_SECRET`.
pub const MIN_SECRET_LEN: usize = 32;

/// Claims stored in every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per the JWT convention
    pub sub: String,
    /// Username at the time of login
    pub username: String,
    /// Random token id, used for revocation
    pub jti: String,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Expiry timestamp (seconds)
    pub exp: i64,
}

/// Issues, validates and revokes tokens. Cheap to clone.
#[derive(Clone)]
pub struct TokenService {
    inner: Arc<TokenServiceInner>,
}

struct TokenServiceInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    /// `jti` -> expiry of revoked tokens
    revoked: DashMap<String, i64>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.inner.ttl)
            .field("revoked", &self.inner.revoked.len())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a service signing with `secret`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the secret is shorter than [`MIN_SECRET_LEN`]
    /// or the lifetime is not positive.
    pub fn new(secret: &str, ttl_minutes: i64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config {
                message: format!("JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"),
            });
        }
        if ttl_minutes <= 0 {
            return Err(Error::Config {
                message: "token_ttl_minutes must be positive".to_string(),
            });
        }

        Ok(Self {
            inner: Arc::new(TokenServiceInner {
                encoding_key: EncodingKey::from_secret(secret.as_bytes()),
                decoding_key: DecodingKey::from_secret(secret.as_bytes()),
                ttl: Duration::minutes(ttl_minutes),
                revoked: DashMap::new(),
            }),
        })
    }

    /// Creates a service from `JWT_SECRET`, generating a per-process secret when unset.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `JWT_SECRET` is set but too short.
    pub fn from_env(ttl_minutes: i64) -> Result<Self> {
        let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
            secret
        } else {
            tracing::warn!(
                "JWT_SECRET not set! Generating a temporary key; tokens won't survive a restart."
            );
            generate_secret()
        };
        Self::new(&secret, ttl_minutes)
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.inner.ttl.num_seconds()
    }

    /// Issues a token for `user`.
    ///
    /// # Errors
    /// Returns [`Error::Token`] if encoding fails.
    pub fn issue(&self, user: &user::Model) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.inner.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.inner.encoding_key).map_err(|e| Error::Token {
            message: e.to_string(),
        })
    }

    /// Decodes and checks a token.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] if the token is invalid, expired or revoked.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.inner.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::unauthorized("Token expired"),
                _ => Error::unauthorized("Invalid token"),
            })?
            .claims;

        if self.inner.revoked.contains_key(&claims.jti) {
            return Err(Error::unauthorized("Token revoked"));
        }
        Ok(claims)
    }

    /// Revokes a token until its natural expiry.
    pub fn revoke(&self, claims: &Claims) {
        let now = Utc::now().timestamp();
        self.inner.revoked.retain(|_, exp| *exp > now);
        self.inner.revoked.insert(claims.jti.clone(), claims.exp);
    }

    /// Extracts the token from an `Authorization` header value.
    #[must_use]
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// The authenticated caller of a protected handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User id
    pub id: i64,
    /// Username
    pub username: String,
    /// Claims of the presented token
    pub claims: Claims,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::debug!(uri = %parts.uri, "Missing authorization header");
                Error::unauthorized("Authentication required")
            })?;

        let token = TokenService::extract_from_header(header)
            .ok_or_else(|| Error::unauthorized("Invalid authorization header"))?;

        let claims = state.tokens.validate(token).inspect_err(|e| {
            tracing::warn!(uri = %parts.uri, error = %e, "Authentication failed");
        })?;

        let id = claims
            .sub
            .parse()
            .map_err(|_| Error::unauthorized("Malformed token subject"))?;

        Ok(Self {
            id,
            username: claims.username.clone(),
            claims,
        })
    }
}
