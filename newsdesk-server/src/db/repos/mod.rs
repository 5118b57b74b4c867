//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Checks out one pooled connection per operation, with retry
//! - Re-validates rows into domain models on the way out
//! - Lets every failure propagate; translation happens in the HTTP layer

pub mod articles;

use async_trait::async_trait;

use crate::db::connect::ConnectionError;
use crate::models::{Article, Category, CategoryPage, Page, ValidationError};

pub use articles::ArticleRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("stored article violates the model: {0}")]
    InvalidRow(#[source] ValidationError),
}

/// Article query operations used by the HTTP layer.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Newest article of every category that has at least one article.
    async fn top_articles(&self) -> Result<Vec<Article>, DbError>;

    /// One page of a category, newest first, with the category's page count.
    async fn category_page(&self, category: Category, page: Page) -> Result<CategoryPage, DbError>;

    /// Store a new article. Identical submissions create distinct rows.
    async fn insert(&self, article: &Article) -> Result<(), DbError>;
}
