//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. Pool creation goes
//! through the same retry/backoff policy as per-operation checkouts.

use sqlx::PgPool;

use super::connect::{acquire, ConnectionError, DatabaseConfig, PoolConnector, RetryPolicy};

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a PostgreSQL connection pool.
///
/// # Errors
///
/// Returns [`ConnectionError`] if no connection could be made within the
/// default retry budget.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, ConnectionError> {
    create_pool_with_options(config, DEFAULT_MAX_CONNECTIONS, RetryPolicy::default()).await
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Arguments
///
/// * `config` - Database credentials
/// * `max_connections` - Maximum number of connections in the pool
/// * `retry` - Retry budget for the initial connection
pub async fn create_pool_with_options(
    config: &DatabaseConfig,
    max_connections: u32,
    retry: RetryPolicy,
) -> Result<PgPool, ConnectionError> {
    tracing::debug!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections,
        "creating database pool"
    );

    let connector = PoolConnector {
        options: config.connect_options(),
        max_connections,
    };
    acquire(&connector, retry).await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p newsdesk-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");

        // Spawn 10 concurrent tasks, more than the pool allows at once
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let mut conn = acquire(&pool, RetryPolicy::default())
                        .await
                        .expect("checkout failed");
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&mut *conn)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
    }
}
