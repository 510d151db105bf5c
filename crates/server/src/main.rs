//! LeadFlow server entrypoint

use std::path::PathBuf;

use leadflow_config::load_settings;
use leadflow_server::{create_router, init_metrics, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("LEADFLOW_CONFIG").ok().map(PathBuf::from);
    let settings = load_settings(config_path.as_deref())?;

    init_metrics();

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(settings);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "leadflow server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
