//! store-server: game rental and shop

use store_server::config::Config;
use store_server::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "store_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting store-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let app = store_server::build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("store-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shared::util::shutdown_signal())
        .await?;

    tracing::info!("store-server stopped");
    Ok(())
}
