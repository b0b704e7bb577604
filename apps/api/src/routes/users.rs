use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::Caller;
use crate::models::{Role, User};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim().to_string();

    if !email.contains('@') {
        return Err(AppError::Validation(format!("'{email}' is not an email address")));
    }
    if name.is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let user = state
        .repo
        .insert_user(User {
            id: Uuid::new_v4(),
            email,
            name,
            role: req.role,
            created_at: Utc::now(),
        })
        .await?;

    info!("Registered {} {}", user.role, user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<User>, AppError> {
    let user = state
        .repo
        .find_user(caller.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", caller.user_id)))?;
    Ok(Json(user))
}
