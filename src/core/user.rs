//! User business logic - registration, login and password hashing.
//!
//! Passwords are hashed with Argon2 (default parameters, random salt) and only the PHC
//! string is stored. Authentication returns the same
//! [`Error::InvalidCredentials`] for an unknown username and a wrong password.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{Set, prelude::*};

/// Hash a password using argon2
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Finds a user by login name.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a user by id.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Registers a new user.
///
/// # Errors
/// Returns an error if:
/// - The username or password is empty
/// - The username is already taken
/// - Hashing or the database insert fails
pub async fn register_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }
    if password.is_empty() {
        return Err(Error::validation("Password cannot be empty"));
    }

    if get_user_by_username(db, username).await?.is_some() {
        return Err(Error::UserAlreadyExists {
            username: username.to_string(),
        });
    }

    let user = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    // The unique index still guards against a concurrent registration.
    let user = user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => Error::UserAlreadyExists {
            username: username.to_string(),
        },
        _ => Error::Database(e),
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Checks a username/password pair.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] if the user is unknown or the password is wrong.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<user::Model> {
    let Some(user) = get_user_by_username(db, username.trim()).await? else {
        tracing::warn!(username = %username, "Login failed - user not found");
        return Err(Error::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        tracing::warn!(username = %username, "Login failed - invalid credentials");
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

/// Creates the account unless one with that username already exists.
///
/// Returns `true` when a new account was created.
pub async fn ensure_user(db: &DatabaseConnection, username: &str, password: &str) -> Result<bool> {
    match register_user(db, username, password).await {
        Ok(_) => Ok(true),
        Err(Error::UserAlreadyExists { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_hash_and_verify_password() -> Result<()> {
        let hash = hash_password("hunter2")?;
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash)?);
        assert!(!verify_password("hunter3", &hash)?);

        // Salted: the same password hashes differently each time
        assert_ne!(hash, hash_password("hunter2")?);
        Ok(())
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        let result = verify_password("hunter2", "not-a-phc-string");
        assert!(matches!(result, Err(Error::PasswordHash { .. })));
    }

    #[tokio::test]
    async fn test_register_user_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = register_user(&db, "  ", "secret").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = register_user(&db, "alice", "").await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_and_authenticate() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(&db, "alice", "secret").await?;
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret");

        let logged_in = authenticate(&db, "alice", "secret").await?;
        assert_eq!(logged_in.id, user.id);

        let found = get_user_by_id(&db, user.id).await?.unwrap();
        assert_eq!(found.username, "alice");

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "alice", "secret").await?;

        let result = register_user(&db, "alice", "other").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UserAlreadyExists { username } if username == "alice"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_credentials() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "alice", "secret").await?;

        let result = authenticate(&db, "alice", "wrong").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidCredentials));

        let result = authenticate(&db, "bob", "secret").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidCredentials));

        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(ensure_user(&db, "admin", "secret").await?);
        assert!(!ensure_user(&db, "admin", "changed").await?);

        // The original password is kept
        authenticate(&db, "admin", "secret").await?;
        Ok(())
    }
}
