mod analysis;
mod ats;
mod config;
mod errors;
mod extract;
mod llm_client;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (a missing key pool degrades AI calls, it does not abort startup)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Wellness API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the LLM client with the provisioned key pool
    if config.google_api_keys.is_empty() {
        warn!("No Gemini API keys configured; analysis requests will fail until GOOGLE_API_KEY is set");
    } else {
        info!(
            "LLM client initialized (model: {}, {} key(s) in pool)",
            llm_client::MODEL,
            config.google_api_keys.len()
        );
    }
    let llm = GeminiClient::new(config.google_api_keys.clone());

    // Build app state
    let state = AppState {
        model: Arc::new(llm),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
