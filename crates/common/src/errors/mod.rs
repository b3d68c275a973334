//! Error types for PaperDesk services
//!
//! Provides a unified error handling system with:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingField,

    // Authentication errors (2xxx)
    Unauthorized,
    InvalidCredentials,
    ExpiredToken,

    // Resource errors (4xxx)
    NotFound,
    PaperNotFound,
    ChatNotFound,

    // Conflict errors (5xxx)
    Conflict,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // External service errors (8xxx)
    SearchUpstreamError,
    CompletionError,
    UpstreamError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingField => 1002,

            ErrorCode::Unauthorized => 2001,
            ErrorCode::InvalidCredentials => 2002,
            ErrorCode::ExpiredToken => 2003,

            ErrorCode::NotFound => 4001,
            ErrorCode::PaperNotFound => 4002,
            ErrorCode::ChatNotFound => 4003,

            ErrorCode::Conflict => 5001,

            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            ErrorCode::SearchUpstreamError => 8001,
            ErrorCode::CompletionError => 8002,
            ErrorCode::UpstreamError => 8003,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    // Authentication errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Token expired")]
    ExpiredToken,

    // Resource errors
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound { resource_type: String, id: String },

    #[error("Paper not found: {link}")]
    PaperNotFound { link: String },

    #[error("Chat not found: {id}")]
    ChatNotFound { id: String },

    // Conflict errors
    #[error("Duplicate resource: {message}")]
    Duplicate { message: String },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // External service errors
    #[error("Search upstream error: {message}")]
    SearchUpstream { message: String },

    #[error("Completion service error: {message}")]
    Completion { message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::ExpiredToken => ErrorCode::ExpiredToken,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::PaperNotFound { .. } => ErrorCode::PaperNotFound,
            AppError::ChatNotFound { .. } => ErrorCode::ChatNotFound,
            AppError::Duplicate { .. } => ErrorCode::Conflict,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::SearchUpstream { .. } => ErrorCode::SearchUpstreamError,
            AppError::Completion { .. } => ErrorCode::CompletionError,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } | AppError::MissingField { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. }
            | AppError::InvalidCredentials
            | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            AppError::NotFound { .. }
            | AppError::PaperNotFound { .. }
            | AppError::ChatNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Duplicate { .. } => StatusCode::CONFLICT,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 502 Bad Gateway
            AppError::SearchUpstream { .. }
            | AppError::Completion { .. }
            | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::PaperNotFound {
            link: "https://arxiv.org/abs/1706.03762".into(),
        };
        assert_eq!(err.code(), ErrorCode::PaperNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::MissingField {
            field: "query".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(!err.is_server_error());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_upstream_error_is_bad_gateway() {
        let err = AppError::SearchUpstream {
            message: "arXiv API responded with status 503".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_auth_errors_are_401() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::ExpiredToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
