//! newsdesk CLI - category news API server
//!
//! - `serve`: bootstrap the database and run the HTTP API
//! - `init-db`: create the schema and seed articles, then exit
//!
//! Every flag can also come from the environment or a `.env` file
//! (current directory, then `~/.newsdesk/.env`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "newsdesk",
    author,
    version,
    about = "Category news API backed by PostgreSQL"
)]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::ServeArgs),
    /// Create the schema and seed data, then exit
    InitDb(commands::InitDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so clap's env fallbacks see .env values
    let loaded_from = config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    if loaded_from.is_empty() {
        info!("Using environment variables only (no .env file found)");
    } else {
        for path in &loaded_from {
            debug!("Loaded .env from {}", path.display());
        }
        info!("Loaded configuration from {} .env file(s)", loaded_from.len());
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb(args) => commands::run_init_db(args).await?,
    }
    Ok(())
}
