use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Evaluation, FitVerdict, JobDescription, Resume, Role, User};
use crate::store::Repository;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!("users.role: {e}")))?;
        Ok(User {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct EvaluationRow {
    id: Uuid,
    resume_id: Uuid,
    job_id: Uuid,
    relevance_score: i32,
    fit_verdict: String,
    missing_skills: Vec<String>,
    missing_certifications: Vec<String>,
    missing_projects: Vec<String>,
    feedback: String,
    hard_match_score: i32,
    soft_match_score: i32,
    evaluated_at: DateTime<Utc>,
    job_title: String,
    company: String,
}

impl TryFrom<EvaluationRow> for Evaluation {
    type Error = AppError;

    fn try_from(row: EvaluationRow) -> Result<Self, Self::Error> {
        let fit_verdict = row
            .fit_verdict
            .parse::<FitVerdict>()
            .map_err(|e: String| AppError::Internal(anyhow::anyhow!("evaluations.fit_verdict: {e}")))?;
        Ok(Evaluation {
            id: row.id,
            resume_id: row.resume_id,
            job_id: row.job_id,
            relevance_score: score_from_db(row.relevance_score),
            fit_verdict,
            missing_skills: row.missing_skills,
            missing_certifications: row.missing_certifications,
            missing_projects: row.missing_projects,
            feedback: row.feedback,
            hard_match_score: score_from_db(row.hard_match_score),
            soft_match_score: score_from_db(row.soft_match_score),
            evaluated_at: row.evaluated_at,
            job_title: row.job_title,
            company: row.company,
        })
    }
}

fn score_from_db(value: i32) -> u32 {
    value.clamp(0, 100) as u32
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Postgres-backed repository. Tables are created by `migrations/`.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, name, role, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => Err(
                AppError::Conflict(format!("Email {} is already registered", user.email)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn insert_resume(&self, resume: Resume) -> Result<Resume, AppError> {
        sqlx::query(
            r#"
            INSERT INTO resumes (id, owner_id, owner_name, owner_email, filename, content, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(resume.id)
        .bind(resume.owner_id)
        .bind(&resume.owner_name)
        .bind(&resume.owner_email)
        .bind(&resume.filename)
        .bind(&resume.content)
        .bind(resume.uploaded_at)
        .execute(&self.pool)
        .await?;
        Ok(resume)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
        Ok(
            sqlx::query_as::<_, Resume>("SELECT * FROM resumes ORDER BY uploaded_at, id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_resumes_by_owner(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        Ok(sqlx::query_as::<_, Resume>(
            "SELECT * FROM resumes WHERE owner_id = $1 ORDER BY uploaded_at, id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_job(&self, job: JobDescription) -> Result<JobDescription, AppError> {
        sqlx::query(
            r#"
            INSERT INTO job_descriptions
                (id, owner_id, title, company, description,
                 required_skills, preferred_skills, experience_level, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(job.id)
        .bind(job.owner_id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(&job.preferred_skills)
        .bind(&job.experience_level)
        .bind(job.created_at)
        .execute(&self.pool)
        .await?;
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError> {
        Ok(
            sqlx::query_as::<_, JobDescription>("SELECT * FROM job_descriptions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_jobs(&self) -> Result<Vec<JobDescription>, AppError> {
        Ok(sqlx::query_as::<_, JobDescription>(
            "SELECT * FROM job_descriptions ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_jobs_by_owner(&self, owner_id: Uuid) -> Result<Vec<JobDescription>, AppError> {
        Ok(sqlx::query_as::<_, JobDescription>(
            "SELECT * FROM job_descriptions WHERE owner_id = $1 ORDER BY created_at, id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Append-only INSERT. Evaluations are never updated.
    async fn save_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, AppError> {
        sqlx::query(
            r#"
            INSERT INTO evaluations
                (id, resume_id, job_id, relevance_score, fit_verdict,
                 missing_skills, missing_certifications, missing_projects, feedback,
                 hard_match_score, soft_match_score, evaluated_at, job_title, company)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(evaluation.id)
        .bind(evaluation.resume_id)
        .bind(evaluation.job_id)
        .bind(evaluation.relevance_score as i32)
        .bind(evaluation.fit_verdict.as_str())
        .bind(&evaluation.missing_skills)
        .bind(&evaluation.missing_certifications)
        .bind(&evaluation.missing_projects)
        .bind(&evaluation.feedback)
        .bind(evaluation.hard_match_score as i32)
        .bind(evaluation.soft_match_score as i32)
        .bind(evaluation.evaluated_at)
        .bind(&evaluation.job_title)
        .bind(&evaluation.company)
        .execute(&self.pool)
        .await?;
        Ok(evaluation)
    }

    async fn get_evaluation(&self, id: Uuid) -> Result<Option<Evaluation>, AppError> {
        sqlx::query_as::<_, EvaluationRow>("SELECT * FROM evaluations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Evaluation::try_from)
            .transpose()
    }

    async fn list_evaluations_for_job(&self, job_id: Uuid) -> Result<Vec<Evaluation>, AppError> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            "SELECT * FROM evaluations WHERE job_id = $1 ORDER BY evaluated_at, id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn list_evaluations_by_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> Result<Vec<Evaluation>, AppError> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            r#"
            SELECT e.*
            FROM evaluations e
            JOIN job_descriptions j ON j.id = e.job_id
            WHERE j.owner_id = $1
            ORDER BY e.evaluated_at, e.id
            "#,
        )
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn list_evaluations_by_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<Evaluation>, AppError> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            r#"
            SELECT e.*
            FROM evaluations e
            JOIN resumes r ON r.id = e.resume_id
            WHERE r.owner_id = $1
            ORDER BY e.evaluated_at, e.id
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }
}
