mod analysis;
mod annotator;
mod config;
mod errors;
mod pdf;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::similarity::{load_or_create_config, VectorizerConfig};
use crate::annotator::LexiconAnnotator;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeN API v{}", env!("CARGO_PKG_VERSION"));

    // Load or seed the persisted vectorizer configuration. Scoring re-fits
    // per request pair, so a broken artifact is downgraded to a warning.
    let vectorizer = match load_or_create_config(&config.model_dir) {
        Ok(cfg) => {
            info!("Vectorizer config ready in {}", config.model_dir.display());
            cfg
        }
        Err(e) => {
            warn!("Vectorizer config unavailable ({e:#}); running with defaults");
            VectorizerConfig::default()
        }
    };

    // The annotator defers tagger initialization to its first use, so
    // startup never blocks on the lexicon artifact.
    let annotator = Arc::new(LexiconAnnotator::new(&config.model_dir, &config.lexicon_url));
    info!("Annotator configured (lexicon source: {})", config.lexicon_url);

    // Build app state
    let state = AppState { annotator, vectorizer };

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
