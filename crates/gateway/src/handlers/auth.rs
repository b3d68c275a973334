//! Account signup and login handlers

use axum::{extract::State, http::StatusCode, Json};
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use paperdesk_common::{
    auth::{hash_password, verify_password},
    db::Repository,
    errors::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub name: String,

    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Create an account and return a session token.
///
/// A duplicate email is a validation failure (400), matching what the
/// signup form expects to render inline.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
        field: None,
    })?;

    let repo = Repository::new(state.db.clone());

    if repo.find_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::Validation {
            message: "Email already registered".to_string(),
            field: Some("email".to_string()),
        });
    }

    let password_hash = hash_password(&request.password)?;
    let user = repo
        .create_user(request.email, request.name, password_hash)
        .await?;

    let token = state.jwt.generate_token(user.id, &user.email)?;

    counter!("paperdesk_signups_total").increment(1);
    tracing::info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse {
                id: user.id,
                email: user.email,
                name: user.name,
            },
        }),
    ))
}

/// Exchange credentials for a session token.
///
/// Unknown email and wrong password produce the same 401 so the response
/// does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let repo = Repository::new(state.db.clone());

    let user = repo
        .find_user_by_email(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.jwt.generate_token(user.id, &user.email)?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            password: "correct-horse-battery".to_string(),
        }
    }

    #[test]
    fn test_valid_signup_passes_validation() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn test_signup_rejects_malformed_email() {
        let mut request = valid_signup();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_rejects_short_password() {
        let mut request = valid_signup();
        request.password = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_rejects_empty_name() {
        let mut request = valid_signup();
        request.name = String::new();
        assert!(request.validate().is_err());
    }
}
