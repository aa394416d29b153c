//! Account handlers.

use crate::{
    db::{NewUser, User},
    error::{ApiError, ApiResult, ErrorContext},
    middleware::auth::Auth,
    request::{LoginRequest, RegisterRequest, ValidatedJson},
    response::{created, ok},
    services::{hash_password, verify_password, verify_unknown_account},
    state::AppState,
};
use axum::{extract::State, response::Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

/// Register a new account
/// POST /api/v1/users/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<Response> {
    let password_hash = hash_password(req.password).await?;

    let user = state
        .users
        .create(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role,
        })
        .await?;

    info!(user_id = %user.id, role = %user.role, "User registered");

    Ok(created(RegisterResponse {
        message: "User registered successfully",
        user,
    }))
}

/// Exchange credentials for an access token
/// POST /api/v1/users/login
///
/// An unknown email and a wrong password produce the same 401.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Response> {
    let Some(user) = state.users.find_by_email(&req.email).await? else {
        verify_unknown_account(req.password).await?;
        warn!("Login attempt for unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(req.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state.tokens.issue(user.id)?;
    info!(user_id = %user.id, "User logged in");

    Ok(ok(LoginResponse {
        message: "User logged in",
        access_token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
    }))
}

/// Profile of the authenticated caller
/// GET /api/v1/users/me
pub async fn me(State(state): State<AppState>, Auth(caller): Auth) -> ApiResult<Response> {
    let user = state
        .users
        .find_by_id(caller.id)
        .await?
        .not_found("User")?;

    Ok(ok(user))
}
