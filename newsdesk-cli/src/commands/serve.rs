//! HTTP server and database bootstrap commands

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Args, Parser};

use newsdesk_server::db::create_pool_with_options;
use newsdesk_server::{
    initialize, run_server, AppState, ArticleRepo, DatabaseConfig, OriginPattern, RetryPolicy,
    ServerConfig,
};

/// Database connection settings
#[derive(Args, Debug)]
pub struct DbArgs {
    /// Database host
    #[arg(long, env = "DB_HOST")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT")]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_USER_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = newsdesk_server::db::pool::DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl DbArgs {
    fn config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
        }
    }
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = newsdesk_server::http::server::DEFAULT_BIND_ADDR)]
    pub bind: SocketAddr,

    /// Regex a request Origin must match in full for CORS
    #[arg(long, env = "ORIGIN_REGEX")]
    pub origin_regex: OriginPattern,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.db.config();
    let pool = create_pool_with_options(&config, args.db.max_connections, RetryPolicy::default())
        .await
        .with_context(|| format!("Failed to connect to {:?}", config))?;

    let report = initialize(&pool)
        .await
        .context("Failed to initialize database")?;
    tracing::info!(
        categories = report.categories,
        seeded = report.seeded,
        "database ready"
    );

    tracing::info!("Starting newsdesk server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        origin_pattern: args.origin_regex,
    };

    // Blocks until shutdown
    run_server(AppState::new(ArticleRepo::new(pool)), config)
        .await
        .context("Server error")?;

    Ok(())
}

/// Create the schema and seed data, then exit
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let config = args.db.config();
    let pool = create_pool_with_options(&config, args.db.max_connections, RetryPolicy::default())
        .await
        .with_context(|| format!("Failed to connect to {:?}", config))?;

    let report = initialize(&pool)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    println!(
        "Database ready: {} categories, {} seed articles inserted",
        report.categories, report.seeded
    );
    Ok(())
}
