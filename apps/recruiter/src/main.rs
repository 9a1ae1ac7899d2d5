mod config;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::extractor::{
    CachingExtractor, CompetencyExtractor, LlmCompetencyExtractor, UnconfiguredExtractor,
};
use crate::matching::scorer::{HybridScorer, ScoringConfig};
use crate::routes::build_router;
use crate::session::RecruitmentSession;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruiter API v{}", env!("CARGO_PKG_VERSION"));

    let extractor: Arc<dyn CompetencyExtractor> = match &config.anthropic_api_key {
        Some(key) => {
            info!("Competency extractor initialized (model: {})", llm_client::MODEL);
            Arc::new(CachingExtractor::new(LlmCompetencyExtractor::new(
                LlmClient::new(key.clone()),
            )))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; competency extraction disabled, matches will score 0");
            Arc::new(UnconfiguredExtractor)
        }
    };

    let scorer = HybridScorer::new(ScoringConfig {
        score_unlisted_required: config.score_unlisted_required,
        ..ScoringConfig::default()
    });
    info!(
        top_n = config.rank_top_n,
        score_unlisted_required = config.score_unlisted_required,
        "Hybrid scorer configured"
    );

    let state = AppState {
        config: config.clone(),
        extractor,
        scorer,
        session: Arc::new(Mutex::new(RecruitmentSession::new())),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
