mod api;
mod app_config;
mod cli;
mod router;
mod state;

use std::sync::Arc;

use tracing::info;

use crate::state::AppState;

async fn serve(config: relay_core::Config) -> anyhow::Result<()> {
    let dispatcher = app_config::build_dispatcher(&config)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let port = config.server.port;
    let state = Arc::new(AppState { config, dispatcher });
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://localhost:{}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let config = app_config::load_config();
    let args: Vec<String> = std::env::args().collect();

    if cli::dispatch(&config, &args).await? {
        return Ok(());
    }

    config.log_summary();
    serve(config).await
}
