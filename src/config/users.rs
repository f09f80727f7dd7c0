//! Bootstrap account configuration from environment variables.
//!
//! `ADMIN_USERNAME` and `ADMIN_PASSWORD` name an account that is created on
//! start-up when it doesn't exist yet, so a fresh install can be logged into
//! without going through `/register`.

/// Credentials for the bootstrap account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapUser {
    /// Login name
    pub username: String,
    /// Plain-text password, hashed before it is stored
    pub password: String,
}

/// Reads the bootstrap account from the environment.
///
/// # Returns
///
/// `Some` only when both variables are set and non-empty.
#[must_use]
pub fn get_bootstrap_user() -> Option<BootstrapUser> {
    bootstrap_user_from(
        std::env::var("ADMIN_USERNAME").ok(),
        std::env::var("ADMIN_PASSWORD").ok(),
    )
}

fn bootstrap_user_from(
    username: Option<String>,
    password: Option<String>,
) -> Option<BootstrapUser> {
    let username = username.filter(|u| !u.trim().is_empty())?;
    let password = password.filter(|p| !p.is_empty())?;
    Some(BootstrapUser {
        username: username.trim().to_string(),
        password,
    })
}
