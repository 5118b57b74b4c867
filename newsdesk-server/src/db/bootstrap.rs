//! One-time database bootstrap
//!
//! Runs before the server accepts requests, in a single transaction held
//! under an advisory lock so concurrent starts serialize:
//! 1. create tables (no-op when they exist)
//! 2. upsert the fixed categories
//! 3. prefill sample articles, only when `articles` is empty

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sqlx::{Connection, PgConnection, PgPool};

use super::connect::{acquire, ConnectionError, RetryPolicy};
use super::repos::articles::insert_article;
use super::repos::DbError;
use crate::models::{Article, ArticlePayload, Category, ValidationError};

/// Sample articles shipped with the binary
const PREFILL_ARTICLES: &str = include_str!("../../data/prefill_articles.json");

/// Advisory lock key held for the duration of bootstrap
const BOOTSTRAP_LOCK_KEY: i64 = 0x6e65_7773_6465_736b;

/// Allowed age of a seed article, in days
const SEED_AGE_DAYS: std::ops::RangeInclusive<i64> = 3..=15;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        name VARCHAR(50) PRIMARY KEY
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        date TIMESTAMPTZ NOT NULL,
        author VARCHAR(50) NOT NULL,
        text VARCHAR(2000) NOT NULL,
        agency VARCHAR(50) NOT NULL,
        category VARCHAR(50) NOT NULL REFERENCES categories(name),
        user_submitted SMALLINT NOT NULL CHECK (user_submitted IN (0, 1))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_articles_category_date ON articles(category, date DESC)",
];

/// Bootstrap failure; the server must not start after one.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("invalid seed article #{index}: {source}")]
    Seed {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("bundled seed data is not valid JSON: {0}")]
    SeedData(#[from] serde_json::Error),
}

impl From<sqlx::Error> for BootstrapError {
    fn from(e: sqlx::Error) -> Self {
        Self::Db(DbError::Sqlx(e))
    }
}

impl From<ConnectionError> for BootstrapError {
    fn from(e: ConnectionError) -> Self {
        Self::Db(DbError::Connection(e))
    }
}

/// What bootstrap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Categories present after the upsert
    pub categories: usize,
    /// Seed articles inserted (0 when the table already had rows)
    pub seeded: usize,
}

/// Seed article as stored in `prefill_articles.json`
#[derive(Debug, Deserialize)]
struct PrefillArticle {
    title: String,
    author: String,
    text: String,
    agency: String,
    category: String,
    /// Days before now
    timedelta: i64,
}

/// Create schema, upsert categories and prefill articles.
pub async fn initialize(pool: &PgPool) -> Result<BootstrapReport, BootstrapError> {
    initialize_with_retry(pool, RetryPolicy::default()).await
}

pub async fn initialize_with_retry(
    pool: &PgPool,
    retry: RetryPolicy,
) -> Result<BootstrapReport, BootstrapError> {
    tracing::info!("Running database bootstrap...");
    let mut conn = acquire(pool, retry).await?;
    let mut tx = conn.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(BOOTSTRAP_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    create_schema(&mut tx).await?;
    let categories = upsert_categories(&mut tx).await?;
    let seeded = prefill_articles(&mut tx, Utc::now()).await?;
    tx.commit().await?;

    let report = BootstrapReport { categories, seeded };
    tracing::info!(
        categories = report.categories,
        seeded = report.seeded,
        "database bootstrap complete"
    );
    Ok(report)
}

async fn create_schema(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(&mut *conn).await?;
    }
    Ok(())
}

async fn upsert_categories(conn: &mut PgConnection) -> Result<usize, sqlx::Error> {
    for category in Category::ALL {
        sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(category.as_str())
            .execute(&mut *conn)
            .await?;
    }
    Ok(Category::ALL.len())
}

/// Insert the bundled articles when the table is empty.
async fn prefill_articles(
    conn: &mut PgConnection,
    now: DateTime<Utc>,
) -> Result<usize, BootstrapError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(&mut *conn)
        .await?;
    if existing > 0 {
        tracing::debug!(existing, "articles present, skipping prefill");
        return Ok(0);
    }

    let articles = parse_prefill(PREFILL_ARTICLES, now)?;
    for article in &articles {
        insert_article(&mut *conn, article).await?;
    }

    Ok(articles.len())
}

/// Parse seed JSON into articles dated `timedelta` days before `now`.
fn parse_prefill(json: &str, now: DateTime<Utc>) -> Result<Vec<Article>, BootstrapError> {
    let entries: Vec<PrefillArticle> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            seed_article(entry, now).map_err(|source| {
                tracing::error!(index, error = %source, "invalid seed article");
                BootstrapError::Seed { index, source }
            })
        })
        .collect()
}

fn seed_article(entry: PrefillArticle, now: DateTime<Utc>) -> Result<Article, ValidationError> {
    if !SEED_AGE_DAYS.contains(&entry.timedelta) {
        return Err(ValidationError::OutOfRange {
            field: "timedelta",
            value: entry.timedelta,
            min: *SEED_AGE_DAYS.start(),
            max: *SEED_AGE_DAYS.end(),
        });
    }

    Article::try_from(ArticlePayload {
        title: entry.title,
        date: now - Duration::days(entry.timedelta),
        author: entry.author,
        text: entry.text,
        agency: entry.agency,
        category: entry.category,
        user_submitted: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn bundled_seed_data_is_valid() {
        let articles = parse_prefill(PREFILL_ARTICLES, now()).unwrap();
        assert!(!articles.is_empty());

        let categories: HashSet<_> = articles.iter().map(|a| a.category).collect();
        assert_eq!(categories.len(), Category::ALL.len());

        for article in &articles {
            assert!(!article.user_submitted.is_user());
            let age = now() - article.date;
            assert!(age >= Duration::days(3) && age <= Duration::days(15));
        }
    }

    #[test]
    fn seed_date_is_now_minus_timedelta() {
        let json = r#"[{"title":"T","author":"A","text":"B","agency":"C",
            "category":"Biology","timedelta":3}]"#;
        let articles = parse_prefill(json, now()).unwrap();
        assert_eq!(articles[0].date, Utc.with_ymd_and_hms(2025, 5, 29, 12, 0, 0).unwrap());
    }

    #[test]
    fn rejects_timedelta_out_of_range() {
        for days in [2, 16] {
            let json = format!(
                r#"[{{"title":"T","author":"A","text":"B","agency":"C",
                "category":"IT","timedelta":{}}}]"#,
                days
            );
            let err = parse_prefill(&json, now()).unwrap_err();
            assert!(matches!(
                err,
                BootstrapError::Seed {
                    index: 0,
                    source: ValidationError::OutOfRange { field: "timedelta", .. }
                }
            ));
        }
    }

    #[test]
    fn reports_index_of_bad_entry() {
        let json = r#"[
            {"title":"T","author":"A","text":"B","agency":"C","category":"IT","timedelta":5},
            {"title":"T","author":"A","text":"B","agency":"C","category":"Poetry","timedelta":5}
        ]"#;
        let err = parse_prefill(json, now()).unwrap_err();
        assert!(matches!(err, BootstrapError::Seed { index: 1, .. }));
    }

    #[test]
    fn rejects_unparsable_seed_file() {
        let err = parse_prefill("[{", now()).unwrap_err();
        assert!(matches!(err, BootstrapError::SeedData(_)));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn initialize_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");

        initialize(&pool).await.expect("first bootstrap failed");
        let second = initialize(&pool).await.expect("second bootstrap failed");
        assert_eq!(second.seeded, 0);
        assert_eq!(second.categories, 6);

        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(categories, 6);
    }
}
