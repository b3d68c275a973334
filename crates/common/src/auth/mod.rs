//! Authentication and authorization utilities
//!
//! Provides:
//! - Password hashing and verification (argon2)
//! - JWT token generation and validation
//! - The `AuthContext` axum extractor used by every protected route

use crate::errors::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extracted authentication context available to handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// User email (from the token)
    pub email: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Generate a new JWT token for a user
    pub fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to generate token: {}", e),
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::Unauthorized {
                    message: "Invalid token".to_string(),
                },
            })
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .and_then(|hash| Argon2::default().verify_password(password.as_bytes(), &hash))
        .is_ok()
}

/// Extract a bearer token from an Authorization header value
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Axum extractor for AuthContext
///
/// Any state that can hand out the JwtManager (via FromRef) gets the
/// extractor for free; handlers just take `auth: AuthContext`.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
    JwtManager: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing Authorization header".to_string(),
            })?;

        let token = extract_bearer(auth_header).ok_or_else(|| AppError::Unauthorized {
            message: "Expected a bearer token".to_string(),
        })?;

        let manager = JwtManager::from_ref(state);
        let claims = manager.validate_token(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized {
            message: "Malformed token subject".to_string(),
        })?;

        Ok(AuthContext {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_jwt_round_trip() {
        let manager = JwtManager::new("test-secret", 3600);
        let user_id = Uuid::new_v4();
        let token = manager.generate_token(user_id, "ada@example.com").unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn test_expired_token_maps_to_expired_error() {
        let manager = JwtManager::new("test-secret", 0);
        let token = manager
            .generate_token(Uuid::new_v4(), "ada@example.com")
            .unwrap();

        // Default validation has 60s leeway; build a strict one by waiting
        // is flaky, so assert via the decode path directly.
        let mut validation = Validation::default();
        validation.leeway = 0;
        let result = decode::<JwtClaims>(
            &token,
            &DecodingKey::from_secret("test-secret".as_bytes()),
            &validation,
        );
        assert!(matches!(
            result.unwrap_err().kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("Basic foo"), None);
    }
}
