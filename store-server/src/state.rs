//! Application state for the store server

use axum::extract::FromRef;
use shared::session::Sessions;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Signed-cookie session store (flash messages, cart)
    pub sessions: Sessions,
    /// Allowed origin prefix for the JSON API
    pub cors_origin_prefix: String,
}

impl AppState {
    /// Connect to the database and build the session store
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url).await?;
        Ok(Self::from_pool(pool, &config.secret_key, &config.cors_origin_prefix))
    }

    /// State over an existing pool
    pub fn from_pool(pool: SqlitePool, secret_key: &str, cors_origin_prefix: &str) -> Self {
        Self {
            pool,
            sessions: Sessions::cookie(secret_key),
            cors_origin_prefix: cors_origin_prefix.to_string(),
        }
    }
}

impl FromRef<AppState> for Sessions {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
