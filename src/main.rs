use std::sync::Arc;

use chat_relay::{config::RelayConfig, routes, state::AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_relay=info,tower_http=info")),
        )
        .init();

    let config = RelayConfig::from_env()?;
    if let Err(err) = config.validate() {
        if config.require_api_key {
            return Err(err.into());
        }
        warn!("{}; chat requests will answer 500 until it is set", err);
    }

    let state = Arc::new(AppState::new(&config));
    let app = routes::create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("chat relay running at http://{}", config.bind_addr);
    info!("relaying to {}", config.upstream_url);
    axum::serve(listener, app).await?;

    Ok(())
}
