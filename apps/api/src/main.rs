mod config;
mod enhancement;
mod errors;
mod extraction;
mod interaction_log;
mod providers;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interaction_log::InteractionLogger;
use crate::providers::create_provider;
use crate::render::{Renderer, TypstRenderer};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (the tracing filter default comes from it)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model provider (fails fast if the matching API key is missing)
    let provider = create_provider(&config)?;
    info!("Model provider initialized ({})", provider.family().label());

    tokio::fs::create_dir_all(&config.output_dir).await?;

    // Initialize interaction log and renderer
    let interaction_log = Arc::new(InteractionLogger::new(&config.interaction_log_dir)?);
    let renderer: Arc<dyn Renderer> = Arc::new(TypstRenderer::new(
        &config.typst_template_dir,
        &config.output_dir,
    ));

    // Build app state
    let state = AppState {
        config: config.clone(),
        provider,
        renderer,
        interaction_log,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
