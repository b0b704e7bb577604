use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Caller;
use crate::models::Evaluation;
use crate::reporting::{self, EvaluationQuery, EvaluationStats, EvaluationView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub resume_id: Uuid,
    pub job_id: Uuid,
}

/// POST /api/v1/evaluations
/// Scores one resume against one of the caller's jobs and stores the result.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<EvaluateRequest>,
) -> Result<(StatusCode, Json<Evaluation>), AppError> {
    caller.require_evaluator()?;

    let job = state
        .repo
        .get_job(req.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", req.job_id)))?;
    if job.owner_id != caller.user_id {
        return Err(AppError::Forbidden);
    }
    let resume = state
        .repo
        .get_resume(req.resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", req.resume_id)))?;

    let evaluation = state.engine.evaluate(&resume, &job).await;
    let evaluation = state.repo.save_evaluation(evaluation).await?;
    info!(
        "Evaluated resume {} against job {}: {} ({})",
        resume.id, job.id, evaluation.relevance_score, evaluation.fit_verdict
    );
    Ok((StatusCode::CREATED, Json(evaluation)))
}

/// Evaluations the caller may see, joined with candidate details.
async fn visible_evaluations(
    state: &AppState,
    caller: &Caller,
) -> Result<Vec<EvaluationView>, AppError> {
    let evaluations = if caller.is_evaluator() {
        state.repo.list_evaluations_by_recruiter(caller.user_id).await?
    } else {
        state.repo.list_evaluations_by_candidate(caller.user_id).await?
    };
    let resumes = state.repo.list_resumes().await?;
    Ok(reporting::with_candidates(evaluations, &resumes))
}

async fn select_visible(
    state: &AppState,
    caller: &Caller,
    query: &EvaluationQuery,
) -> Result<Vec<EvaluationView>, AppError> {
    let filter = query.filter()?;
    let views = visible_evaluations(state, caller).await?;
    Ok(reporting::select(views, &filter, query.sort_by, query.order))
}

/// GET /api/v1/evaluations?job_id&verdict&search&sort_by&order
pub async fn handle_list_evaluations(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<EvaluationQuery>,
) -> Result<Json<Vec<EvaluationView>>, AppError> {
    Ok(Json(select_visible(&state, &caller, &query).await?))
}

/// GET /api/v1/evaluations/export.csv
/// Same filters as the listing, rendered as a CSV attachment. Evaluators only.
pub async fn handle_export_csv(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<EvaluationQuery>,
) -> Result<impl IntoResponse, AppError> {
    caller.require_evaluator()?;
    let views = select_visible(&state, &caller, &query).await?;
    let body = reporting::to_csv(&views)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        reporting::export_filename(Utc::now())
    );
    info!("Exported {} evaluations as CSV", views.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// GET /api/v1/evaluations/stats
/// Dashboard numbers. Evaluators: their jobs and every resume in the pool.
/// Candidates: their own resumes against all jobs.
pub async fn handle_evaluation_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<EvaluationStats>, AppError> {
    let views = visible_evaluations(&state, &caller).await?;
    let (jobs, resume_count) = if caller.is_evaluator() {
        (
            state.repo.list_jobs_by_owner(caller.user_id).await?,
            state.repo.list_resumes().await?.len(),
        )
    } else {
        (
            state.repo.list_jobs().await?,
            state.repo.list_resumes_by_owner(caller.user_id).await?.len(),
        )
    };
    Ok(Json(reporting::summarize(&views, &jobs, resume_count)))
}

/// GET /api/v1/evaluations/:id
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Evaluation>, AppError> {
    let evaluation = state
        .repo
        .get_evaluation(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Evaluation {id} not found")))?;

    let allowed = if caller.is_evaluator() {
        state
            .repo
            .get_job(evaluation.job_id)
            .await?
            .is_some_and(|job| job.owner_id == caller.user_id)
    } else {
        state
            .repo
            .get_resume(evaluation.resume_id)
            .await?
            .is_some_and(|resume| resume.owner_id == caller.user_id)
    };
    if !allowed {
        return Err(AppError::Forbidden);
    }
    Ok(Json(evaluation))
}
