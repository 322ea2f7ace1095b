//! API routes

mod auth;
mod health;
mod templates;
pub mod types;

use axum::{Router, extract::DefaultBodyLimit};

use crate::state::AppState;

/// Request bodies are small JSON documents
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main router
///
/// `/register`, `/login` and the health checks are public; everything
/// under `/templates` sits behind the token gate.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .merge(health::routes())
        // Registration and login
        .merge(auth::routes())
        // Token-gated template CRUD
        .merge(templates::routes(state.jwt.clone()))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
