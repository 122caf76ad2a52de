//! Application state for the faculty server

use axum::extract::FromRef;
use shared::session::Sessions;
use sqlx::AnyPool;

use crate::config::Config;
use crate::db;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database pool (PostgreSQL or SQLite)
    pub pool: AnyPool,
    /// Signed-cookie session store (flash messages)
    pub sessions: Sessions,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url).await?;
        Ok(Self::from_pool(pool, &config.secret_key))
    }

    pub fn from_pool(pool: AnyPool, secret_key: &str) -> Self {
        Self {
            pool,
            sessions: Sessions::cookie(secret_key),
        }
    }
}

impl FromRef<AppState> for Sessions {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
