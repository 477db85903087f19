//! beerstore binary.
//!
//! Opens the configured SQLite database, creates the `beer` table if needed,
//! and prints the stored catalogue to stdout as one JSON object per line.

mod config;

use std::io::{self, Write};
use std::process::ExitCode;

use beerstore_beer::{BeerError, BeerService};
use beerstore_db::{ConnectionError, DbPool, PoolError, Storage};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Fatal startup and runtime failures.
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("failed to get database connection for schema setup: {0}")]
    Connection(#[from] ConnectionError),
    #[error("failed to create beer schema: {0}")]
    Schema(#[from] rusqlite::Error),
    #[error(transparent)]
    Beer(#[from] BeerError),
    #[error("failed to encode beer: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn resolve_config_path() -> (String, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (path, "cli-arg");
    }

    if let Ok(path) = std::env::var("BEERSTORE_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (path, "env-var");
        }
    }

    ("config.toml".to_string(), "default")
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so stdout carries only the catalogue.
    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

/// Writes every stored beer as a JSON line. Returns how many were written.
fn write_catalogue<S: Storage>(
    service: &BeerService<S>,
    out: &mut impl Write,
) -> Result<usize, AppError> {
    let beers = service.get_all()?;
    for beer in &beers {
        serde_json::to_writer(&mut *out, beer)?;
        writeln!(out)?;
    }
    Ok(beers.len())
}

/// Builds the pool and makes sure the `beer` table exists.
fn open_service(database: &config::DatabaseConfig) -> Result<BeerService<DbPool>, AppError> {
    let pool = beerstore_db::create_pool(&database.path, database.runtime_settings())?;
    {
        let conn = pool.connection()?;
        beerstore_db::init_schema(&conn)?;
    }
    Ok(BeerService::new(pool))
}

fn run() -> Result<(), AppError> {
    let (config_path, config_source) = resolve_config_path();

    let (config, found) = config::load_config(&config_path)?;
    init_tracing(&config.logging);

    tracing::info!(
        source = config_source,
        path = %config_path,
        "resolved startup configuration path"
    );
    if !found {
        tracing::info!(path = %config_path, "config file not found, using defaults");
    }

    let service = open_service(&config.database)?;
    let stdout = io::stdout();
    let count = write_catalogue(&service, &mut stdout.lock())?;
    tracing::info!(count, path = %config.database.path, "listed beer catalogue");

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "beerstore failed");
            eprintln!("beerstore: {e}");
            ExitCode::FAILURE
        }
    }
}
