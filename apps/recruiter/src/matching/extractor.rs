//! Competency extraction: turns a job's free-text competency description
//! into a `CompetencyModel`.
//!
//! The extractor is an oracle: it either returns a model or fails. Callers
//! that must keep going treat a failure as "no model" and score everyone 0.
//!
//! `AppState` holds an `Arc<dyn CompetencyExtractor>`, chosen at startup from
//! whether an API key is configured.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::matching::competency::CompetencyModel;
use crate::matching::prompts::{build_extraction_prompt, COMPETENCY_EXTRACTION_ROLE};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("competency extraction is not configured (missing API key)")]
    NotConfigured,

    #[error("competency description is empty")]
    EmptyDescription,

    #[error("competency extraction failed: {0}")]
    Llm(#[from] LlmError),
}

#[async_trait]
pub trait CompetencyExtractor: Send + Sync {
    async fn extract(&self, competency_text: &str) -> Result<CompetencyModel, ExtractionError>;
}

/// Extracts via the LLM client.
pub struct LlmCompetencyExtractor {
    llm: LlmClient,
    system: String,
}

impl LlmCompetencyExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: format!("{COMPETENCY_EXTRACTION_ROLE} {JSON_ONLY_SYSTEM}"),
        }
    }
}

#[async_trait]
impl CompetencyExtractor for LlmCompetencyExtractor {
    async fn extract(&self, competency_text: &str) -> Result<CompetencyModel, ExtractionError> {
        if competency_text.trim().is_empty() {
            return Err(ExtractionError::EmptyDescription);
        }

        let prompt = build_extraction_prompt(competency_text);
        let value = self.llm.call_json(&prompt, &self.system).await?;
        let model = CompetencyModel::from_value(&value);
        if model.is_empty() {
            warn!("LLM reply held no usable competencies; every candidate will score 0");
        }

        info!(
            required = model.required.len(),
            desirable = model.desirable.len(),
            synonym_groups = model.synonyms.len(),
            "competencies extracted"
        );
        Ok(model)
    }
}

/// Stand-in used when no LLM credentials are configured.
pub struct UnconfiguredExtractor;

#[async_trait]
impl CompetencyExtractor for UnconfiguredExtractor {
    async fn extract(&self, _competency_text: &str) -> Result<CompetencyModel, ExtractionError> {
        Err(ExtractionError::NotConfigured)
    }
}

/// Memoises successful extractions by description text. Failures are not
/// cached, so a later call can still succeed.
///
/// Entries are never evicted: the map grows with every distinct description
/// for the life of the process.
pub struct CachingExtractor<E> {
    inner: E,
    cache: Mutex<HashMap<String, CompetencyModel>>,
}

impl<E: CompetencyExtractor> CachingExtractor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, key: &str) -> Option<CompetencyModel> {
        self.cache
            .lock()
            .expect("extraction cache mutex poisoned")
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl<E: CompetencyExtractor> CompetencyExtractor for CachingExtractor<E> {
    async fn extract(&self, competency_text: &str) -> Result<CompetencyModel, ExtractionError> {
        let key = competency_text.trim();
        if let Some(model) = self.cached(key) {
            debug!("competency extraction served from cache");
            return Ok(model);
        }

        let model = self.inner.extract(competency_text).await?;
        self.cache
            .lock()
            .expect("extraction cache mutex poisoned")
            .insert(key.to_string(), model.clone());
        Ok(model)
    }
}
