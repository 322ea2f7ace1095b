//! AIOPass REST API
//!
//! This crate provides the Axum-based HTTP API: registration and login,
//! and the token-gated template endpoints.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
