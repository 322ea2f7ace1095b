//! Request/Response DTOs

use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Register and login request
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Register and login response
#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: i64,
}

// ==================== Template Types ====================

/// Add template request
#[derive(Deserialize)]
pub struct AddTemplateRequest {
    pub prompt: String,
}
