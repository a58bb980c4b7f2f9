use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use payhook::config::AppConfig;
use payhook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!("✅ App config loaded: {}", config.get_config_info());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;

    let app_state = AppState::from_config(config).context("failed to initialize payment providers")?;
    let app = payhook::build_router(app_state);

    tracing::info!("🚀 Server starting on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
