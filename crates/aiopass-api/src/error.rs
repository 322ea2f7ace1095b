//! API error types

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Body rejected before it could be parsed, e.g. over the size limit
    #[error("Request rejected ({0}): {1}")]
    Rejected(StatusCode, String),

    #[error("Database error: {0}")]
    Database(#[from] aiopass_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] aiopass_auth::AuthError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest(rejection.body_text())
            }
            other => ApiError::Rejected(other.status(), other.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Rejected(status, msg) => (status, msg),
            ApiError::Database(e) => match e {
                aiopass_db::DbError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                aiopass_db::DbError::Duplicate(msg) => (StatusCode::CONFLICT, msg),
                other => {
                    error!("Database error: {}", other);
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },
            ApiError::Auth(e) => return e.into_response(),
        };

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiopass_auth::AuthError;
    use aiopass_db::DbError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Rejected(StatusCode::PAYLOAD_TOO_LARGE, "x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (DbError::NotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (DbError::Duplicate("x".into()).into(), StatusCode::CONFLICT),
            (DbError::Migration("x".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (AuthError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (
                AuthError::PasswordHash("x".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AuthError::TokenLifetime(i64::MAX).into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
