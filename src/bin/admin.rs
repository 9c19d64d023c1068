//! Maintenance CLI.
//!
//! The redirect path reaps expired links lazily, one at a time; this binary
//! exposes the bulk variant for a periodic job:
//!
//! ```bash
//! DATABASE_URL=postgres://... geoshort-admin purge-expired
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geoshort::domain::repositories::LinkRepository;
use geoshort::infrastructure::persistence::PgLinkRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "geoshort-admin", about = "Maintenance commands for geoshort")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Delete every link whose expiry is in the past.
    PurgeExpired,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Command::PurgeExpired => {
            let repository = PgLinkRepository::new(Arc::new(pool));
            let deleted = repository.delete_expired().await?;
            println!("Deleted {} expired link(s)", deleted);
        }
    }

    Ok(())
}
