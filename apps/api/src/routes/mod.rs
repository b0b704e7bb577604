pub mod evaluations;
pub mod health;
pub mod jobs;
pub mod resumes;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and the small text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Identity
        .route("/api/v1/users", post(users::handle_create_user))
        .route("/api/v1/users/me", get(users::handle_get_me))
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload_resume).get(resumes::handle_list_resumes),
        )
        .route("/api/v1/resumes/:id", get(resumes::handle_get_resume))
        // Jobs
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/jobs/:id/evaluations",
            get(jobs::handle_job_evaluations),
        )
        // Evaluations
        .route(
            "/api/v1/evaluations",
            post(evaluations::handle_evaluate).get(evaluations::handle_list_evaluations),
        )
        .route(
            "/api/v1/evaluations/export.csv",
            get(evaluations::handle_export_csv),
        )
        .route(
            "/api/v1/evaluations/stats",
            get(evaluations::handle_evaluation_stats),
        )
        .route(
            "/api/v1/evaluations/:id",
            get(evaluations::handle_get_evaluation),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
