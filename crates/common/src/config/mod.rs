//! Configuration management for PaperDesk services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{env}.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// arXiv lookup configuration
    pub arxiv: ArxivConfig,

    /// Chat-completion assistant configuration
    pub assistant: AssistantConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Primary database URL (for writes)
    pub url: String,

    /// Read replica URL (optional, falls back to primary)
    pub read_url: Option<String>,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT secret for token signing
    pub jwt_secret: Option<String>,

    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArxivConfig {
    /// arXiv API base URL
    #[serde(default = "default_arxiv_base_url")]
    pub base_url: String,

    /// Default number of results per search
    #[serde(default = "default_arxiv_max_results")]
    pub max_results: usize,

    /// Request timeout in seconds
    #[serde(default = "default_arxiv_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantConfig {
    /// API key for the completion service; when absent every reply is
    /// generated by the local fallback
    pub api_key: Option<String>,

    /// Completion API base URL (OpenAI-compatible)
    #[serde(default = "default_assistant_base_url")]
    pub api_base: String,

    /// Model to use
    #[serde(default = "default_assistant_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_assistant_temperature")]
    pub temperature: f32,

    /// Maximum tokens per reply
    #[serde(default = "default_assistant_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_assistant_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_shutdown_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    300
}
fn default_jwt_expiration() -> u64 {
    86400
}
fn default_arxiv_base_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}
fn default_arxiv_max_results() -> usize {
    15
}
fn default_arxiv_timeout() -> u64 {
    20
}
fn default_assistant_base_url() -> String {
    "https://api.together.xyz/v1".to_string()
}
fn default_assistant_model() -> String {
    "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string()
}
fn default_assistant_temperature() -> f32 {
    0.7
}
fn default_assistant_max_tokens() -> u32 {
    800
}
fn default_assistant_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_json_logging() -> bool {
    true
}
fn default_service_name() -> String {
    "paperdesk".to_string()
}

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__SERVER__PORT=8081
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Get the read database URL (falls back to primary)
    pub fn read_database_url(&self) -> &str {
        self.database.read_url.as_deref().unwrap_or(&self.database.url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
                shutdown_timeout_secs: default_shutdown_timeout(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/paperdesk".to_string(),
                read_url: None,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
            },
            auth: AuthConfig {
                jwt_secret: None,
                jwt_expiration_secs: default_jwt_expiration(),
            },
            arxiv: ArxivConfig {
                base_url: default_arxiv_base_url(),
                max_results: default_arxiv_max_results(),
                timeout_secs: default_arxiv_timeout(),
            },
            assistant: AssistantConfig {
                api_key: None,
                api_base: default_assistant_base_url(),
                model: default_assistant_model(),
                temperature: default_assistant_temperature(),
                max_tokens: default_assistant_max_tokens(),
                timeout_secs: default_assistant_timeout(),
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logging: default_json_logging(),
                service_name: default_service_name(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.arxiv.max_results, 15);
        assert!(config.assistant.api_key.is_none());
    }

    #[test]
    fn test_read_database_fallback() {
        let config = AppConfig::default();
        assert_eq!(config.read_database_url(), "postgres://localhost/paperdesk");
    }
}
