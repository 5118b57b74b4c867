//! newsdesk-server: category news articles over HTTP
//!
//! Serves the newest article per category, paginated category listings and
//! article submission, backed by PostgreSQL.

pub mod db;
pub mod http;
pub mod models;

pub use db::bootstrap::{initialize, BootstrapError, BootstrapReport};
pub use db::{ArticleRepo, ArticleStore, DatabaseConfig, DbError, RetryPolicy};
pub use http::{run_server, AppState, OriginPattern, ServerConfig};
