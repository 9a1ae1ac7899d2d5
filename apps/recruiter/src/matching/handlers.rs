//! Axum route handlers for competency extraction, scoring and ranking.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::matching::competency::CompetencyModel;
use crate::matching::ranker::{rank, Candidate, ScoredCandidate};
use crate::matching::scorer::ScoreBreakdown;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A candidate as posted by clients: either a ready-made `text`, or the raw
/// `skills` and `cv` fields that are joined into one.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidatePayload {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub cv: Option<String>,
}

impl From<CandidatePayload> for Candidate {
    fn from(payload: CandidatePayload) -> Self {
        match payload.text {
            Some(text) => Candidate {
                id: payload.id,
                name: payload.name,
                text,
            },
            None => Candidate::from_profile(
                payload.id,
                payload.name,
                payload.skills.as_deref(),
                payload.cv.as_deref(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub competency_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub model: CompetencyModel,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub model: Option<CompetencyModel>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: u32,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub candidates: Vec<CandidatePayload>,
    #[serde(default)]
    pub model: Option<CompetencyModel>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub candidates: Vec<ScoredCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub competency_text: String,
    pub candidates: Vec<CandidatePayload>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_id: String,
    /// `None` when extraction failed; every candidate then scores 0.
    pub model: Option<CompetencyModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
    pub candidates: Vec<ScoredCandidate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/competencies/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let model = state.extractor.extract(&request.competency_text).await?;
    Ok(Json(ExtractResponse { model }))
}

/// POST /api/v1/candidates/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    let breakdown = state.scorer.breakdown(&request.text, request.model.as_ref());
    Json(ScoreResponse {
        score: breakdown.total,
        breakdown,
    })
}

/// POST /api/v1/candidates/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let top_n = resolve_top_n(request.top_n, &state)?;
    let candidates: Vec<Candidate> = request.candidates.into_iter().map(Into::into).collect();
    let ranked = rank(&state.scorer, &candidates, request.model.as_ref(), top_n);
    Ok(Json(RankResponse { candidates: ranked }))
}

/// POST /api/v1/jobs/:job_id/match
///
/// Extracts the job's competencies and ranks its candidate pool. A failed
/// extraction does not fail the request: the pool is ranked without a model.
pub async fn handle_match(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let top_n = resolve_top_n(request.top_n, &state)?;

    let (model, extraction_error) = match state.extractor.extract(&request.competency_text).await
    {
        Ok(model) => (Some(model), None),
        Err(e) => {
            warn!(job_id = %job_id, error = %e, "competency extraction failed, ranking without a model");
            (None, Some(e.to_string()))
        }
    };

    let candidates: Vec<Candidate> = request.candidates.into_iter().map(Into::into).collect();
    let ranked = rank(&state.scorer, &candidates, model.as_ref(), top_n);
    info!(
        job_id = %job_id,
        pool = candidates.len(),
        returned = ranked.len(),
        "candidates ranked"
    );

    Ok(Json(MatchResponse {
        job_id,
        model,
        extraction_error,
        candidates: ranked,
    }))
}

fn resolve_top_n(requested: Option<usize>, state: &AppState) -> Result<usize, AppError> {
    match requested {
        Some(0) => Err(AppError::Validation("top_n must be at least 1".to_string())),
        Some(n) => Ok(n),
        None => Ok(state.config.rank_top_n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_prefers_explicit_text() {
        let payload: CandidatePayload = serde_json::from_str(
            r#"{"id": "1", "text": "Rust dev", "skills": "ignored", "cv": "ignored"}"#,
        )
        .unwrap();
        let candidate: Candidate = payload.into();
        assert_eq!(candidate.text, "Rust dev");
    }

    #[test]
    fn test_payload_joins_skills_and_cv() {
        let payload: CandidatePayload = serde_json::from_str(
            r#"{"id": "2", "name": "Carla", "skills": "SQL", "cv": "Ten years of BI"}"#,
        )
        .unwrap();
        let candidate: Candidate = payload.into();
        assert_eq!(candidate.text, "SQL Ten years of BI");
        assert_eq!(candidate.name.as_deref(), Some("Carla"));
    }

    #[test]
    fn test_score_request_accepts_null_model() {
        let request: ScoreRequest =
            serde_json::from_str(r#"{"text": "python", "model": null}"#).unwrap();
        assert!(request.model.is_none());
    }

    #[test]
    fn test_rank_request_accepts_malformed_model() {
        let request: RankRequest = serde_json::from_str(
            r#"{"candidates": [], "model": {"obrigatorias": 7, "sinonimos": "x"}}"#,
        )
        .unwrap();
        assert_eq!(request.model, Some(CompetencyModel::default()));
    }
}
