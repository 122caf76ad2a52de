//! faculty-server: student registration

use faculty_server::config::Config;
use faculty_server::state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "faculty_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting faculty-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let app = faculty_server::build_app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("faculty-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shared::util::shutdown_signal())
        .await?;

    tracing::info!("faculty-server stopped");
    Ok(())
}
