//! Template routes
//!
//! Templates are shared by all users; the token gate only requires that
//! the caller is someone.

use aiopass_auth::{AuthUser, JwtManager, auth_middleware};
use aiopass_db::Template;
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware,
    routing::{delete, get},
};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::AddTemplateRequest;

/// Maximum allowed prompt length in bytes
const MAX_PROMPT_LENGTH: usize = 10_000;

fn validate_prompt(prompt: &str) -> Result<(), ApiError> {
    if prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt cannot be empty".to_string()));
    }
    if prompt.len() > MAX_PROMPT_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Prompt exceeds maximum length of {} bytes",
            MAX_PROMPT_LENGTH
        )));
    }
    Ok(())
}

/// GET /templates
async fn list_templates(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Template>>, ApiError> {
    Ok(Json(state.store.list_templates().await?))
}

/// POST /templates
async fn add_template(
    user: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<AddTemplateRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    validate_prompt(&request.prompt)?;

    let template = state.store.add_template(&request.prompt).await?;
    info!("User {} added template {}", user.id, template.id);

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /templates/{id}
async fn delete_template(
    user: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    state.store.delete_template(id).await?;
    info!("User {} deleted template {}", user.id, id);

    Ok(StatusCode::NO_CONTENT)
}

/// Create template routes behind the token gate
pub fn routes(jwt: Arc<JwtManager>) -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates).post(add_template))
        .route("/templates/{id}", delete(delete_template))
        .route_layer(middleware::from_fn_with_state(jwt, auth_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_prompt() {
        assert!(validate_prompt("Hello").is_ok());
        assert!(validate_prompt("").is_err());
        assert!(validate_prompt("   \n").is_err());
        assert!(validate_prompt(&"x".repeat(MAX_PROMPT_LENGTH)).is_ok());
        assert!(validate_prompt(&"x".repeat(MAX_PROMPT_LENGTH + 1)).is_err());
    }
}
