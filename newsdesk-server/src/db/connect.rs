//! Connection acquisition with retry and exponential backoff
//!
//! Every connection the server uses, whether the startup pool or a
//! per-operation checkout, goes through [`acquire`]. A failed attempt is
//! classified and logged, then the next attempt waits
//! `initial_delay ^ attempt` seconds. Once the attempt budget is spent the
//! caller gets a terminal [`ConnectionError`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};

/// Attempts per operation unless configured otherwise
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base of the backoff exponent, in seconds
pub const DEFAULT_INITIAL_DELAY_SECS: u64 = 2;

/// Database credentials and location
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    /// sqlx connect options for these credentials.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Retry budget for acquiring a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Base of the exponential backoff, in seconds.
    pub initial_delay_secs: u64,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay_secs: u64) -> Self {
        Self {
            max_attempts,
            initial_delay_secs,
        }
    }

    /// Wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.initial_delay_secs.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_INITIAL_DELAY_SECS)
    }
}

/// Something that can open a single connection.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Send;

    async fn connect(&self) -> Result<Self::Connection, sqlx::Error>;
}

/// Checkout from an existing pool
#[async_trait]
impl Connector for PgPool {
    type Connection = PoolConnection<Postgres>;

    async fn connect(&self) -> Result<Self::Connection, sqlx::Error> {
        self.acquire().await
    }
}

/// Builds the pool itself; used once at startup.
#[derive(Clone)]
pub struct PoolConnector {
    pub options: PgConnectOptions,
    pub max_connections: u32,
}

#[async_trait]
impl Connector for PoolConnector {
    type Connection = PgPool;

    async fn connect(&self) -> Result<Self::Connection, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(self.options.clone())
            .await
    }
}

/// Why a connection attempt failed, for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Wrong user or password
    Authentication,
    /// Database name does not exist on the server
    MissingDatabase,
    Other,
}

impl FailureKind {
    /// Classify by PostgreSQL SQLSTATE.
    pub fn from_sqlstate(code: Option<&str>) -> Self {
        match code {
            Some("28P01") | Some("28000") => Self::Authentication,
            Some("3D000") => Self::MissingDatabase,
            _ => Self::Other,
        }
    }

    pub fn classify(err: &sqlx::Error) -> Self {
        let code = err.as_database_error().and_then(|e| e.code());
        Self::from_sqlstate(code.as_deref())
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "wrong credentials"),
            Self::MissingDatabase => write!(f, "database does not exist"),
            Self::Other => write!(f, "connection failed"),
        }
    }
}

/// Retry budget exhausted
#[derive(Debug, thiserror::Error)]
#[error("failed to connect to the database after {attempts} attempts")]
pub struct ConnectionError {
    pub attempts: u32,
    #[source]
    pub source: sqlx::Error,
}

/// Acquire a connection, retrying with exponential backoff.
///
/// A `max_attempts` of zero is treated as one attempt.
pub async fn acquire<C>(connector: &C, policy: RetryPolicy) -> Result<C::Connection, ConnectionError>
where
    C: Connector + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match connector.connect().await {
            Ok(conn) => {
                if attempt > 1 {
                    tracing::info!(attempt, "database connection established after retry");
                }
                return Ok(conn);
            }
            Err(err) => {
                let kind = FailureKind::classify(&err);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    kind = %kind,
                    error = %err,
                    "database connection attempt failed"
                );

                if attempt >= max_attempts {
                    return Err(ConnectionError {
                        attempts: attempt,
                        source: err,
                    });
                }

                tokio::time::sleep(policy.delay_for(attempt)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Fails a fixed number of times, then hands out the attempt number.
    struct Flaky {
        failures: u32,
        attempts: AtomicU32,
        started: Instant,
        seen_at: Mutex<Vec<Duration>>,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                attempts: AtomicU32::new(0),
                started: Instant::now(),
                seen_at: Mutex::new(Vec::new()),
            }
        }

        fn seen_at(&self) -> Vec<Duration> {
            self.seen_at.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Connector for Flaky {
        type Connection = u32;

        async fn connect(&self) -> Result<u32, sqlx::Error> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            self.seen_at.lock().unwrap().push(self.started.elapsed());

            if attempt <= self.failures {
                Err(sqlx::Error::PoolTimedOut)
            } else {
                Ok(attempt)
            }
        }
    }

    #[test]
    fn delay_is_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(8));

        let policy = RetryPolicy::new(5, 3);
        assert_eq!(policy.delay_for(2), Duration::from_secs(9));
    }

    #[test]
    fn classifies_sqlstate() {
        assert_eq!(
            FailureKind::from_sqlstate(Some("28P01")),
            FailureKind::Authentication
        );
        assert_eq!(
            FailureKind::from_sqlstate(Some("28000")),
            FailureKind::Authentication
        );
        assert_eq!(
            FailureKind::from_sqlstate(Some("3D000")),
            FailureKind::MissingDatabase
        );
        assert_eq!(FailureKind::from_sqlstate(Some("08006")), FailureKind::Other);
        assert_eq!(FailureKind::from_sqlstate(None), FailureKind::Other);
        assert_eq!(
            FailureKind::classify(&sqlx::Error::PoolTimedOut),
            FailureKind::Other
        );
    }

    #[test]
    fn config_debug_hides_password() {
        let config = DatabaseConfig {
            host: "db".into(),
            port: 5432,
            user: "news".into(),
            password: "hunter2".into(),
            database: "news".into(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_failures() {
        let connector = Flaky::new(2);
        let conn = acquire(&connector, RetryPolicy::new(3, 2)).await.unwrap();

        assert_eq!(conn, 3);
        // waits of 2^1 then 2^2 seconds between attempts
        assert_eq!(
            connector.seen_at(),
            vec![
                Duration::ZERO,
                Duration::from_secs(2),
                Duration::from_secs(6)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let connector = Flaky::new(u32::MAX);
        let err = acquire(&connector, RetryPolicy::new(3, 2)).await.unwrap_err();

        assert_eq!(err.attempts, 3);
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 3);
        assert!(matches!(err.source, sqlx::Error::PoolTimedOut));
        // no sleep after the final attempt
        assert_eq!(connector.started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn first_attempt_success_does_not_wait() {
        let connector = Flaky::new(0);
        assert_eq!(acquire(&connector, RetryPolicy::default()).await.unwrap(), 1);
        assert_eq!(connector.started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_still_tries_once() {
        let connector = Flaky::new(u32::MAX);
        let err = acquire(&connector, RetryPolicy::new(0, 2)).await.unwrap_err();
        assert_eq!(err.attempts, 1);
    }
}
