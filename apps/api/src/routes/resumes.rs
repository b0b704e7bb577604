use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Caller;
use crate::ingest::extract_text;
use crate::models::Resume;
use crate::state::AppState;

struct Upload {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// POST /api/v1/resumes
///
/// Multipart form: `file` (required), `name` and `email` (optional, default to
/// the registered user). Uploading does not evaluate.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    caller: Caller,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    caller.require_candidate()?;

    let mut upload: Option<Upload> = None;
    let mut name: Option<String> = None;
    let mut email: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                upload = Some(Upload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("name") => name = Some(field.text().await.map_err(multipart_error)?),
            Some("email") => email = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    let content = extract_text(
        &upload.data,
        upload.content_type.as_deref(),
        &upload.file_name,
        state.config.max_upload_bytes,
    )
    .await?;

    let registered = state.repo.find_user(caller.user_id).await?;
    let owner_name = non_blank(name)
        .or_else(|| registered.as_ref().map(|u| u.name.clone()))
        .ok_or_else(|| AppError::Validation("name is required for unregistered users".to_string()))?;
    let owner_email = non_blank(email)
        .or_else(|| registered.as_ref().map(|u| u.email.clone()))
        .ok_or_else(|| AppError::Validation("email is required for unregistered users".to_string()))?;

    let resume = state
        .repo
        .insert_resume(Resume::new(
            caller.user_id,
            owner_name,
            owner_email,
            upload.file_name,
            content,
        ))
        .await?;

    info!(
        "Stored resume {} ({}, {} chars)",
        resume.id,
        resume.filename,
        resume.content.chars().count()
    );
    Ok((StatusCode::CREATED, Json(resume)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/v1/resumes
/// Evaluators see every resume; candidates see their own.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Resume>>, AppError> {
    let resumes = if caller.is_evaluator() {
        state.repo.list_resumes().await?
    } else {
        state.repo.list_resumes_by_owner(caller.user_id).await?
    };
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let resume = state
        .repo
        .get_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    if !caller.is_evaluator() && resume.owner_id != caller.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(Json(resume))
}
