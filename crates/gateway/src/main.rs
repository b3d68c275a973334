//! PaperDesk API Gateway
//!
//! The main entry point for all external API requests.
//! Handles:
//! - Account signup/login and JWT authentication
//! - Library, history, and recently-viewed persistence
//! - arXiv search proxying
//! - Chat message persistence and reply generation
//! - Observability (logging, metrics)

mod handlers;
mod metrics;

use axum::extract::FromRef;
use axum::{
    routing::{delete, get, post},
    Router,
};
use paperdesk_arxiv::ArxivClient;
use paperdesk_assistant::Responder;
use paperdesk_common::{auth::JwtManager, config::AppConfig, db::DbPool, errors::AppError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
    pub arxiv: Arc<ArxivClient>,
    pub responder: Arc<Responder>,
    pub jwt: JwtManager,
}

// Gives the AuthContext extractor access to token validation.
impl FromRef<AppState> for JwtManager {
    fn from_ref(state: &AppState) -> JwtManager {
        state.jwt.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting PaperDesk API Gateway v{}", paperdesk_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let config = Arc::new(config);

    // Initialize metrics
    metrics::register_metrics();

    // Token signing requires a configured secret
    let jwt_secret = config
        .auth
        .jwt_secret
        .as_deref()
        .ok_or_else(|| AppError::Configuration {
            message: "auth.jwt_secret is not set".to_string(),
        })?;
    let jwt = JwtManager::new(jwt_secret, config.auth.jwt_expiration_secs);

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Domain services
    let arxiv = Arc::new(ArxivClient::new(&config.arxiv)?);
    let responder = Arc::new(Responder::from_config(&config.assistant)?);

    // Create app state
    let state = AppState {
        config: config.clone(),
        db,
        arxiv,
        responder,
        jwt,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        // Auth endpoints (no auth)
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        // Library endpoints
        .route("/library", get(handlers::library::get_library))
        .route("/library", post(handlers::library::add_to_library))
        .route("/library", delete(handlers::library::remove_from_library))
        // Recently-viewed endpoints
        .route("/recently-viewed", get(handlers::recently_viewed::get_recently_viewed))
        .route("/recently-viewed", post(handlers::recently_viewed::record_view))
        .route("/recently-viewed", delete(handlers::recently_viewed::remove_recently_viewed))
        // History endpoints
        .route("/history", get(handlers::history::get_history))
        .route("/history", post(handlers::history::record_history))
        .route("/history", delete(handlers::history::remove_history))
        // Chat endpoints
        .route("/chat", get(handlers::chat::get_messages))
        .route("/chat", post(handlers::chat::ask))
        .route("/chat/messages", post(handlers::chat::persist_message))
        // Chats resource
        .route("/chats", get(handlers::chats::list_chats))
        .route("/chats", post(handlers::chats::create_chat))
        .route("/chats/{id}", get(handlers::chats::get_chat))
        .route("/chats/{id}", delete(handlers::chats::delete_chat))
        .route("/chats/{id}/messages", get(handlers::chats::get_chat_messages))
        .route("/chats/{id}/messages", post(handlers::chats::add_chat_message))
        // Search endpoints (no auth)
        .route("/search", get(handlers::search::search))
        .route("/search/arxiv", get(handlers::search::search_arxiv));

    // Compose the app
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
