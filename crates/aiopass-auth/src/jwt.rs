//! JWT token management

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Longest token lifetime accepted (ten years)
pub const MAX_TOKEN_EXPIRY_HOURS: i64 = 10 * 365 * 24;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// ID of the user the token was issued to
    pub user_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT manager for token generation and validation
///
/// Tokens are HS256-signed with a process-wide secret. There is no
/// revocation list: a token stays valid until its `exp`.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_expiry_hours,
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> Result<i64, AuthError> {
        self.token_expiry_hours
            .checked_mul(3600)
            .ok_or(AuthError::TokenLifetime(self.token_expiry_hours))
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = Duration::try_hours(self.token_expiry_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(AuthError::TokenLifetime(self.token_expiry_hours))?;

        let claims = Claims {
            user_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Generating token for user id {}", user_id);

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Validate a JWT token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => {
                        debug!("Rejected token: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?;

        // Validation applies leeway to exp; enforce it strictly here
        let now = Utc::now().timestamp();
        if token_data.claims.exp < now {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_and_validation() {
        let manager = JwtManager::new("test-secret-key", 24);

        let token = manager.generate_token(42).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_round_trip_preserves_extreme_ids() {
        let manager = JwtManager::new("test-secret-key", 1);

        for id in [0, 1, -1, i64::MAX, i64::MIN] {
            let token = manager.generate_token(id).unwrap();
            assert_eq!(manager.validate_token(&token).unwrap().user_id, id);
        }
    }

    #[test]
    fn test_lifetime_overflow_is_error() {
        let manager = JwtManager::new("s", 10_000_000_000);
        assert!(matches!(
            manager.generate_token(1),
            Err(AuthError::TokenLifetime(10_000_000_000))
        ));

        let manager = JwtManager::new("s", i64::MAX / 1000);
        assert!(matches!(manager.expires_in(), Err(AuthError::TokenLifetime(_))));
    }

    #[test]
    fn test_longest_allowed_lifetime_works() {
        let manager = JwtManager::new("s", MAX_TOKEN_EXPIRY_HOURS);

        let token = manager.generate_token(1).unwrap();
        assert_eq!(manager.validate_token(&token).unwrap().user_id, 1);
        assert_eq!(manager.expires_in().unwrap(), MAX_TOKEN_EXPIRY_HOURS * 3600);
    }

    #[test]
    fn test_invalid_token() {
        let manager = JwtManager::new("test-secret-key", 24);

        let result = manager.validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("secret-one", 24);
        let verifier = JwtManager::new("secret-two", 24);

        let token = issuer.generate_token(7).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let manager = JwtManager::new("test-secret-key", 24);
        let token = manager.generate_token(7).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", head, flipped, &signature[1..]);

        assert!(matches!(
            manager.validate_token(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("test-secret-key", 24);
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 3,
            exp: now - 2 * 3600,
            iat: now - 3 * 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert!(matches!(
            manager.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_without_expiry_rejected() {
        let manager = JwtManager::new("test-secret-key", 24);
        let token = encode(
            &Header::default(),
            &serde_json::json!({ "user_id": 3 }),
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert!(manager.validate_token(&token).is_err());
    }
}
