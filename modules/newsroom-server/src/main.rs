use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsroom_common::Config;
use newsroom_server::deps::build_runner;
use newsroom_server::routes::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.log_redacted();

    let runner = build_runner(&config);
    info!(model = runner.model(), "Episode runner ready");

    let app = build_router(AppState::new(runner, config.default_primitives));

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Newsroom trace server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
