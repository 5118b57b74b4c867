//! Database layer - connection acquisition, bootstrap and repositories
//!
//! # Design Principles
//!
//! - Bounded connection pool; one checkout per logical operation
//! - Retry with exponential backoff when creating the pool and on checkout
//! - Schema and seed data are set up once, before serving

pub mod connect;
pub mod pool;
pub mod bootstrap;
pub mod repos;

pub use connect::{acquire, ConnectionError, Connector, DatabaseConfig, RetryPolicy};
pub use pool::{create_pool, create_pool_with_options};
pub use repos::{ArticleRepo, ArticleStore, DbError};
