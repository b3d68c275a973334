//! PaperDesk Common Library
//!
//! Shared code for the PaperDesk services including:
//! - Domain types (papers, chat messages)
//! - Database models and repository pattern
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use types::{ChatHistory, ChatMessage, ChatRole, Paper};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
