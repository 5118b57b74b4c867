//! Axum server setup
//!
//! Server skeleton with:
//! - CORS restricted to origins matching the configured pattern
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::cors::OriginPattern;
use super::routes;
use crate::db::ArticleStore;

/// Default bind address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Origins allowed by CORS
    pub origin_pattern: OriginPattern,
}

/// Shared application state
pub struct AppState {
    pub articles: Box<dyn ArticleStore>,
}

impl AppState {
    pub fn new(articles: impl ArticleStore + 'static) -> Self {
        Self {
            articles: Box::new(articles),
        }
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::articles::router())
        .merge(routes::categories::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&db_config).await?;
/// bootstrap::initialize(&pool).await?;
/// run_server(AppState::new(ArticleRepo::new(pool)), config).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(origins = %config.origin_pattern, "CORS origin pattern loaded");
    let app = build_router(state, config.origin_pattern.layer());

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 8000);
    }
}
