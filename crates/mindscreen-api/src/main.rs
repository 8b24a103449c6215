use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mindscreen_api::config::ServerConfig;
use mindscreen_api::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    // A bad config aborts startup; there is no partially loaded registry.
    let bundle = mindscreen_instruments::source::from_dir(&config.config_dir)?;
    let registry = mindscreen_instruments::load_instruments(bundle)?;
    let app = mindscreen_api::app(AppState::new(registry));

    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        config_dir = %config.config_dir.display(),
        "mindscreen api listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
