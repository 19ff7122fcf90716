mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod sentiment;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::matcher::{KeywordMatchScorer, MatchScorer};
use crate::config::Config;
use crate::routes::build_router;
use crate::sentiment::SentimentClassifier;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    let scorer: Arc<dyn MatchScorer> = Arc::new(KeywordMatchScorer);
    info!("Match scorer: {}", scorer.backend());

    // Provider client is built on first sentiment request, not here.
    if config.openai_api_key.is_none() {
        info!("OPENAI_API_KEY not set; /api/v1/sentiment will report a configuration error");
    }
    let sentiment = Arc::new(SentimentClassifier::from_config(&config));

    let state = AppState {
        config: config.clone(),
        scorer,
        sentiment,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
