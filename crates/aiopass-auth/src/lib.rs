//! AIOPass Authentication
//!
//! This crate provides Argon2 password hashing, JWT issuance and
//! validation, and the Axum middleware that gates protected routes.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtManager, MAX_TOKEN_EXPIRY_HOURS};
pub use middleware::{AuthUser, auth_middleware};
pub use password::{hash_password, verify_password};
