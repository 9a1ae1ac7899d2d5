//! Axum route handlers for the interview pipeline of a job.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::handlers::CandidatePayload;
use crate::matching::ranker::Candidate;
use crate::session::{ChatMessage, ChatRole, FinalReport, Finalist};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub candidates: Vec<CandidatePayload>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub job_id: String,
    pub shortlist: Vec<Candidate>,
}

/// Labels used when a transcript is flattened for report generation.
const CANDIDATE_LABEL: &str = "Candidate";
const INTERVIEWER_LABEL: &str = "Interviewer";

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub active_job: Option<String>,
    pub shortlist: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub job_id: String,
    pub candidate_id: String,
    pub messages: Vec<ChatMessage>,
    /// `Candidate: ...` / `Interviewer: ...` lines, ready for a report prompt.
    pub rendered: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub report: String,
}

#[derive(Debug, Serialize)]
pub struct FinalistsResponse {
    pub job_id: String,
    pub finalists: Vec<Finalist>,
    pub comparison_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_reports: Option<String>,
}

/// GET /api/v1/session
pub async fn handle_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.lock().expect("session mutex poisoned");
    let active_job = session.active_job().map(str::to_string);
    let shortlist = active_job
        .as_deref()
        .and_then(|job_id| session.shortlist(job_id).ok())
        .map(<[Candidate]>::to_vec)
        .unwrap_or_default();
    Json(SessionResponse {
        active_job,
        shortlist,
    })
}

/// POST /api/v1/jobs/:job_id/selection
pub async fn handle_confirm_selection(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    let candidates: Vec<Candidate> = request.candidates.into_iter().map(Into::into).collect();
    let mut session = state.session.lock().expect("session mutex poisoned");
    let shortlist = session.confirm_selection(&job_id, candidates)?.to_vec();
    Ok(Json(SelectionResponse { job_id, shortlist }))
}

/// GET /api/v1/jobs/:job_id/interviews/:candidate_id
///
/// Not read-only: the first call seeds the transcript with the assistant's
/// greeting. Later calls return the transcript unchanged.
pub async fn handle_open_interview(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let mut session = state.session.lock().expect("session mutex poisoned");
    let messages = session.open_interview(&job_id, &candidate_id)?.to_vec();
    let rendered =
        session.render_transcript(&job_id, &candidate_id, CANDIDATE_LABEL, INTERVIEWER_LABEL)?;
    Ok(Json(TranscriptResponse {
        job_id,
        candidate_id,
        messages,
        rendered,
    }))
}

/// POST /api/v1/jobs/:job_id/interviews/:candidate_id/messages
pub async fn handle_record_message(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TranscriptResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let mut session = state.session.lock().expect("session mutex poisoned");
    let messages = session
        .record_message(&job_id, &candidate_id, request.role, request.content)?
        .to_vec();
    let rendered =
        session.render_transcript(&job_id, &candidate_id, CANDIDATE_LABEL, INTERVIEWER_LABEL)?;
    Ok(Json(TranscriptResponse {
        job_id,
        candidate_id,
        messages,
        rendered,
    }))
}

/// PUT /api/v1/jobs/:job_id/interviews/:candidate_id/report
pub async fn handle_record_report(
    State(state): State<AppState>,
    Path((job_id, candidate_id)): Path<(String, String)>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<FinalReport>, AppError> {
    if request.report.trim().is_empty() {
        return Err(AppError::Validation("report cannot be empty".to_string()));
    }

    let mut session = state.session.lock().expect("session mutex poisoned");
    let report = session
        .record_report(&job_id, &candidate_id, request.report)?
        .clone();
    Ok(Json(report))
}

/// GET /api/v1/jobs/:job_id/finalists
pub async fn handle_finalists(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<FinalistsResponse>, AppError> {
    let session = state.session.lock().expect("session mutex poisoned");
    let finalists = session.finalists(&job_id)?;
    let comparison_ready = session.comparison_ready(&job_id);
    let combined_reports = comparison_ready
        .then(|| session.combined_reports(&job_id))
        .transpose()?;

    Ok(Json(FinalistsResponse {
        job_id,
        finalists,
        comparison_ready,
        combined_reports,
    }))
}
