//! Caller identity, supplied by the fronting session layer as request headers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Role;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn is_evaluator(&self) -> bool {
        self.role == Role::Evaluator
    }

    /// Rejects callers without the evaluator role.
    pub fn require_evaluator(&self) -> Result<(), AppError> {
        if self.is_evaluator() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn require_candidate(&self) -> Result<(), AppError> {
        if self.role == Role::Candidate {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| AppError::Unauthorized(format!("{USER_ID_HEADER} is not a valid UUID")))?;
        let role = header(parts, USER_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(AppError::Unauthorized)?;

        Ok(Caller { user_id, role })
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {name} header")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(headers: &[(&str, &str)]) -> Result<Caller, AppError> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_headers() {
        let id = Uuid::new_v4();
        let caller = extract(&[(USER_ID_HEADER, &id.to_string()), (USER_ROLE_HEADER, "recruiter")])
            .await
            .unwrap();
        assert_eq!(caller.user_id, id);
        assert!(caller.is_evaluator());
        assert!(caller.require_candidate().is_err());
    }

    #[tokio::test]
    async fn test_missing_headers_unauthorized() {
        let err = extract(&[(USER_ROLE_HEADER, "candidate")]).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_bad_role_unauthorized() {
        let id = Uuid::new_v4().to_string();
        let err = extract(&[(USER_ID_HEADER, &id), (USER_ROLE_HEADER, "admin")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
