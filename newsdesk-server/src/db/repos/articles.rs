//! Article repository
//!
//! - top: `DISTINCT ON (category)` picks the newest row per category
//! - page: LIMIT/OFFSET listing plus a separate COUNT for the page total
//! - insert: single positional INSERT, committed in a transaction

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{Connection, FromRow, PgPool, Postgres};

use super::{ArticleStore, DbError};
use crate::db::connect::{acquire, RetryPolicy};
use crate::models::{total_pages, Article, ArticlePayload, Category, CategoryPage, Page};

const SELECT_TOP_ARTICLES: &str = r#"
    SELECT DISTINCT ON (category)
        title, date, author, text, agency, category, user_submitted
    FROM articles
    ORDER BY category, date DESC, id DESC
"#;

const SELECT_CATEGORY_ARTICLES: &str = r#"
    SELECT title, date, author, text, agency, category, user_submitted
    FROM articles
    WHERE category = $1
    ORDER BY date DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

const COUNT_CATEGORY_ARTICLES: &str = "SELECT COUNT(*) FROM articles WHERE category = $1";

const INSERT_ARTICLE: &str = r#"
    INSERT INTO articles (title, date, author, text, agency, category, user_submitted)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

/// Article row as stored
#[derive(Debug, FromRow)]
struct ArticleRow {
    title: String,
    date: DateTime<Utc>,
    author: String,
    text: String,
    agency: String,
    category: String,
    user_submitted: i16,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DbError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Article::try_from(ArticlePayload {
            title: row.title,
            date: row.date,
            author: row.author,
            text: row.text,
            agency: row.agency,
            category: row.category,
            user_submitted: i64::from(row.user_submitted),
        })
        .map_err(DbError::InvalidRow)
    }
}

fn into_articles(rows: Vec<ArticleRow>) -> Result<Vec<Article>, DbError> {
    rows.into_iter().map(Article::try_from).collect()
}

/// Insert one article on any Postgres executor.
pub(crate) async fn insert_article<'e, E>(executor: E, article: &Article) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(INSERT_ARTICLE)
        .bind(article.title.as_str())
        .bind(article.date)
        .bind(article.author.as_str())
        .bind(article.text.as_str())
        .bind(article.agency.as_str())
        .bind(article.category.as_str())
        .bind(article.user_submitted.as_i16())
        .execute(executor)
        .await?;
    Ok(())
}

/// Article repository
#[derive(Clone)]
pub struct ArticleRepo {
    pool: PgPool,
    retry: RetryPolicy,
}

impl ArticleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self::with_retry(pool, RetryPolicy::default())
    }

    pub fn with_retry(pool: PgPool, retry: RetryPolicy) -> Self {
        Self { pool, retry }
    }

    async fn checkout(&self) -> Result<PoolConnection<Postgres>, DbError> {
        Ok(acquire(&self.pool, self.retry).await?)
    }
}

#[async_trait]
impl ArticleStore for ArticleRepo {
    async fn top_articles(&self) -> Result<Vec<Article>, DbError> {
        let mut conn = self.checkout().await?;

        let rows: Vec<ArticleRow> = sqlx::query_as(SELECT_TOP_ARTICLES)
            .fetch_all(&mut *conn)
            .await?;

        into_articles(rows)
    }

    async fn category_page(&self, category: Category, page: Page) -> Result<CategoryPage, DbError> {
        let mut conn = self.checkout().await?;

        let rows: Vec<ArticleRow> = sqlx::query_as(SELECT_CATEGORY_ARTICLES)
            .bind(category.as_str())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *conn)
            .await?;

        // Separate read; a concurrent insert may shift the total by one page
        let count: i64 = sqlx::query_scalar(COUNT_CATEGORY_ARTICLES)
            .bind(category.as_str())
            .fetch_one(&mut *conn)
            .await?;

        Ok(CategoryPage {
            articles: into_articles(rows)?,
            total_pages: total_pages(count),
        })
    }

    async fn insert(&self, article: &Article) -> Result<(), DbError> {
        let mut conn = self.checkout().await?;

        let mut tx = conn.begin().await?;
        insert_article(&mut *tx, article).await?;
        tx.commit().await?;

        tracing::debug!(
            category = %article.category,
            title = %article.title.as_str(),
            "article stored"
        );
        Ok(())
    }
}
