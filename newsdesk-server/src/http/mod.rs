//! HTTP server layer
//!
//! Axum server with:
//! - CORS by origin pattern
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod server;
pub mod cors;
pub mod error;
pub mod extractors;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use cors::OriginPattern;
pub use error::ApiError;
