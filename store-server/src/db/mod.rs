//! Database Module
//!
//! SQLite connection pool, migrations and per-table repositories.

pub mod customer;
pub mod game;
pub mod order;
pub mod rental;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Open the pool for `database_url` and apply embedded migrations
///
/// An in-memory URL gets a single connection that never expires, otherwise
/// every new connection would see its own empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, BoxError> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!(in_memory, "Database connection established (SQLite)");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
