use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::matching::extractor::CompetencyExtractor;
use crate::matching::scorer::HybridScorer;
use crate::session::RecruitmentSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// LLM-backed when an API key is configured, `UnconfiguredExtractor` otherwise.
    pub extractor: Arc<dyn CompetencyExtractor>,
    pub scorer: HybridScorer,
    /// The single reviewer session this service hosts.
    pub session: Arc<Mutex<RecruitmentSession>>,
}
