//! Database Module
//!
//! One `AnyPool` serves PostgreSQL and SQLite. Queries use `$N`
//! placeholders, which both backends accept. The table is created on
//! start-up with the DDL dialect of the connected backend.

pub mod student;

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const POSTGRES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS students (
    id            BIGSERIAL PRIMARY KEY,
    name          VARCHAR(100) NOT NULL,
    email         VARCHAR(100) NOT NULL UNIQUE,
    course        VARCHAR(10)  NOT NULL,
    matriculation VARCHAR(20)  NOT NULL UNIQUE
)";

const SQLITE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS students (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    course        TEXT NOT NULL,
    matriculation TEXT NOT NULL UNIQUE
)";

const COURSE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_students_course ON students (course, id)";

fn is_sqlite(database_url: &str) -> bool {
    database_url.starts_with("sqlite:")
}

/// Open the pool and make sure the schema exists
pub async fn connect(database_url: &str) -> Result<AnyPool, BoxError> {
    sqlx::any::install_default_drivers();

    let options = if database_url.contains(":memory:") {
        // One connection that never expires: each new one would be a fresh database
        AnyPoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        AnyPoolOptions::new().max_connections(5)
    };
    let pool = options.connect(database_url).await?;

    let schema = if is_sqlite(database_url) {
        SQLITE_SCHEMA
    } else {
        POSTGRES_SCHEMA
    };
    sqlx::query(schema).execute(&pool).await?;
    sqlx::query(COURSE_INDEX).execute(&pool).await?;

    tracing::info!(
        backend = if is_sqlite(database_url) { "sqlite" } else { "postgres" },
        "Database ready"
    );
    Ok(pool)
}
