pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::matching::handlers as matching;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route(
            "/api/v1/competencies/extract",
            post(matching::handle_extract),
        )
        .route("/api/v1/candidates/score", post(matching::handle_score))
        .route("/api/v1/candidates/rank", post(matching::handle_rank))
        .route("/api/v1/jobs/:job_id/match", post(matching::handle_match))
        // Interview pipeline API
        .route("/api/v1/session", get(session::handle_session))
        .route(
            "/api/v1/jobs/:job_id/selection",
            post(session::handle_confirm_selection),
        )
        .route(
            "/api/v1/jobs/:job_id/interviews/:candidate_id",
            get(session::handle_open_interview),
        )
        .route(
            "/api/v1/jobs/:job_id/interviews/:candidate_id/messages",
            post(session::handle_record_message),
        )
        .route(
            "/api/v1/jobs/:job_id/interviews/:candidate_id/report",
            put(session::handle_record_report),
        )
        .route(
            "/api/v1/jobs/:job_id/finalists",
            get(session::handle_finalists),
        )
        .with_state(state)
}
