use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Caller;
use crate::matching::orchestrator::ProgressCallback;
use crate::matching::BatchProgress;
use crate::models::{Evaluation, JobDescription};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub experience_level: String,
}

#[derive(Debug, Serialize)]
pub struct JobCreatedResponse {
    pub job: JobDescription,
    /// Evaluations of every stored resume against the new job, in upload order.
    pub evaluations: Vec<Evaluation>,
    pub total: usize,
    pub cancelled: bool,
}

/// Trims each entry and drops the blank ones.
fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// POST /api/v1/jobs
///
/// Stores the job, then evaluates every stored resume against it and persists
/// the results.
pub async fn handle_create_job(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobCreatedResponse>), AppError> {
    caller.require_evaluator()?;

    let title = req.title.trim().to_string();
    let company = req.company.trim().to_string();
    if title.is_empty() || company.is_empty() {
        return Err(AppError::Validation(
            "title and company must not be empty".to_string(),
        ));
    }

    let job = state
        .repo
        .insert_job(JobDescription {
            id: Uuid::new_v4(),
            owner_id: caller.user_id,
            title,
            company,
            description: req.description.trim().to_string(),
            required_skills: clean_skills(req.required_skills),
            preferred_skills: clean_skills(req.preferred_skills),
            experience_level: req.experience_level.trim().to_string(),
            created_at: Utc::now(),
        })
        .await?;
    info!("Created job {} '{}' at {}", job.id, job.title, job.company);

    let resumes = state.repo.list_resumes().await?;
    let job_id = job.id;
    let mut log_progress = |p: BatchProgress| {
        debug!("Job {job_id}: evaluated {}/{}", p.completed, p.total);
    };
    let progress: ProgressCallback<'_> = &mut log_progress;
    let cancel = state.shutdown.child_token();
    let outcome = state
        .engine
        .evaluate_batch(&resumes, &job, Some(progress), &cancel)
        .await;

    let mut saved = Vec::with_capacity(outcome.evaluations.len());
    for evaluation in outcome.evaluations {
        saved.push(state.repo.save_evaluation(evaluation).await?);
    }
    if outcome.cancelled {
        warn!(
            "Job {} evaluation interrupted: {}/{} saved",
            job.id,
            saved.len(),
            outcome.total
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(JobCreatedResponse {
            job,
            evaluations: saved,
            total: outcome.total,
            cancelled: outcome.cancelled,
        }),
    ))
}

/// GET /api/v1/jobs
/// Evaluators see the jobs they own; candidates browse all jobs.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<JobDescription>>, AppError> {
    let jobs = if caller.is_evaluator() {
        state.repo.list_jobs_by_owner(caller.user_id).await?
    } else {
        state.repo.list_jobs().await?
    };
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDescription>, AppError> {
    let job = state
        .repo
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// GET /api/v1/jobs/:id/evaluations
/// Stored evaluations for one of the caller's jobs, in evaluation order.
pub async fn handle_job_evaluations(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Evaluation>>, AppError> {
    caller.require_evaluator()?;
    let job = state
        .repo
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    if job.owner_id != caller.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(Json(state.repo.list_evaluations_for_job(id).await?))
}
