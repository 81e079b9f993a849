mod background;
mod config;
mod errors;
mod layout;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::background::HttpImageFetcher;
use crate::config::Config;
use crate::layout::LayoutType;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Storyboard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize image fetcher
    let fetcher = HttpImageFetcher::new(config.image_fetch_timeout)?;
    info!(
        "Image fetcher initialized (timeout: {}s)",
        config.image_fetch_timeout.as_secs()
    );
    info!("Layout templates available: {}", LayoutType::ALL.len());

    // Build app state
    let state = AppState {
        config: config.clone(),
        fetcher: Arc::new(fetcher),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the editor host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
