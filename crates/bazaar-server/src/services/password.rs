//! Password hashing.
//!
//! Argon2 is CPU-bound, so both operations run on the blocking pool.

use crate::error::{ApiError, ApiResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Hash a password into a PHC string.
pub async fn hash_password(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ApiError::Internal(anyhow::anyhow!("password hashing failed: {err}")))
    })
    .await
    .map_err(|err| ApiError::Internal(err.into()))?
}

/// Hash checked when the account does not exist, so a login for an unknown
/// email costs the same Argon2 work as a wrong password.
static UNKNOWN_ACCOUNT_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"no account has this password", &salt)
        .map(|hash| hash.to_string())
        .ok()
});

fn verify_blocking(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Check a password against a stored PHC string. A malformed hash never matches.
pub async fn verify_password(password: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(|err| ApiError::Internal(err.into()))
}

/// Run a verification that always fails, for logins naming no account.
pub async fn verify_unknown_account(password: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
            verify_blocking(&password, hash);
        }
        false
    })
    .await
    .map_err(|err| ApiError::Internal(err.into()))
}
