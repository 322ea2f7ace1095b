//! Registration and login routes

use aiopass_auth::{AuthError, hash_password, verify_password};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{CredentialsRequest, TokenResponse};

// ==================== Input Validation ====================

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate username format and length
fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    // ASCII only, so the byte limit above is also a character limit
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(ApiError::BadRequest(
            "Username can only contain ASCII letters, digits, underscores, and hyphens".to_string(),
        ));
    }
    Ok(())
}

/// Validate password length
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hash checked when the username is unknown, so both login failures cost
/// one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("aiopass-dummy-password").ok());

// ==================== Auth Routes ====================

/// POST /register
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;
    validate_username(&request.username)?;
    validate_password(&request.password)?;

    debug!("Registering user: {}", request.username);

    let user = state
        .store
        .create_user(&request.username, &request.password)
        .await?;

    let token = state.jwt.generate_token(user.id)?;

    info!("Registered user {} (id {})", user.username, user.id);

    Ok(Json(TokenResponse {
        token,
        expires_in: state.jwt.expires_in()?,
    }))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;

    // Validate input lengths to prevent DoS
    if request.username.is_empty() || request.username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest("Invalid username".to_string()));
    }
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    debug!("Login attempt for user: {}", request.username);

    let user = state.store.find_user_by_username(&request.username).await?;

    // An unknown user and a wrong password must be indistinguishable
    let user = match user {
        Some(user) if verify_password(&request.password, &user.password_hash)? => user,
        Some(_) => return Err(AuthError::InvalidCredentials.into()),
        None => {
            match DUMMY_HASH.as_deref() {
                Some(dummy) => {
                    let _ = verify_password(&request.password, dummy);
                }
                None => warn!("No dummy hash; unknown-user logins skip hashing"),
            }
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let token = state.jwt.generate_token(user.id)?;

    info!("User {} logged in successfully", user.username);

    Ok(Json(TokenResponse {
        token,
        expires_in: state.jwt.expires_in()?,
    }))
}

/// Create auth routes
///
/// Builds the dummy hash up front so the first unknown-user login does not
/// pay for it, and so a hashing failure shows up at startup.
pub fn routes() -> Router<AppState> {
    if LazyLock::force(&DUMMY_HASH).is_none() {
        warn!("Failed to build dummy password hash; unknown-user logins will answer faster");
    }

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
