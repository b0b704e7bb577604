//! Persistence for users, resumes, jobs, and evaluations.
//!
//! `AppState` holds an `Arc<dyn Repository>`, chosen at startup: Postgres when
//! `DATABASE_URL` is set, in-memory otherwise. Evaluations are append-only.

pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Evaluation, JobDescription, Resume, User};

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

#[async_trait]
pub trait Repository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_user(&self, user: User) -> Result<User, AppError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn insert_resume(&self, resume: Resume) -> Result<Resume, AppError>;
    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError>;
    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError>;
    async fn list_resumes_by_owner(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError>;

    async fn insert_job(&self, job: JobDescription) -> Result<JobDescription, AppError>;
    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError>;
    async fn list_jobs(&self) -> Result<Vec<JobDescription>, AppError>;
    async fn list_jobs_by_owner(&self, owner_id: Uuid) -> Result<Vec<JobDescription>, AppError>;

    async fn save_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, AppError>;
    async fn get_evaluation(&self, id: Uuid) -> Result<Option<Evaluation>, AppError>;
    async fn list_evaluations_for_job(&self, job_id: Uuid) -> Result<Vec<Evaluation>, AppError>;
    /// Evaluations against jobs the recruiter owns.
    async fn list_evaluations_by_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> Result<Vec<Evaluation>, AppError>;
    /// Evaluations of resumes the candidate owns.
    async fn list_evaluations_by_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<Evaluation>, AppError>;
}
