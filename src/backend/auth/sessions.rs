/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens carry only the user id; everything else is looked up on each
 * request by the auth gate.
 */

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, SessionError> {
        Uuid::parse_str(&self.sub).map_err(|_| SessionError::Invalid)
    }
}

/// Token errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token has expired")]
    Expired,
    #[error("token is invalid")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies bearer tokens with one HMAC secret
#[derive(Clone)]
pub struct SessionManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Create a token for `user_id`, valid from now
    pub fn create_token(&self, user_id: Uuid) -> Result<String, SessionError> {
        self.create_token_at(user_id, Utc::now())
    }

    /// Create a token as if issued at `issued_at`
    pub fn create_token_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (issued_at + self.ttl).timestamp(),
            iat: issued_at.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!("Failed to sign token: {:?}", e);
            SessionError::Signing(e.to_string())
        })
    }

    /// Verify signature and expiry and decode the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, SessionError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new("test-secret", Duration::days(DEFAULT_TOKEN_TTL_DAYS))
    }

    #[test]
    fn test_create_and_verify_token() {
        let sessions = manager();
        let user_id = Uuid::new_v4();
        let token = sessions.create_token(user_id).unwrap();
        assert!(!token.is_empty());

        let claims = sessions.verify_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
    }

    #[test]
    fn test_token_valid_within_seven_days() {
        let sessions = manager();
        let issued = Utc::now() - Duration::days(7) + Duration::minutes(1);
        let token = sessions.create_token_at(Uuid::new_v4(), issued).unwrap();
        assert!(sessions.verify_token(&token).is_ok());
    }

    #[test]
    fn test_token_expires_after_seven_days() {
        let sessions = manager();
        let issued = Utc::now() - Duration::days(7) - Duration::minutes(1);
        let token = sessions.create_token_at(Uuid::new_v4(), issued).unwrap();
        assert!(matches!(sessions.verify_token(&token), Err(SessionError::Expired)));
    }

    #[test]
    fn test_verify_invalid_token() {
        let sessions = manager();
        assert!(matches!(sessions.verify_token("invalid.token.here"), Err(SessionError::Invalid)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = SessionManager::new("another-secret", Duration::days(7));
        let token = other.create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(manager().verify_token(&token), Err(SessionError::Invalid)));
    }
}
