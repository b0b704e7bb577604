use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Evaluation, JobDescription, Resume, User};
use crate::store::Repository;

/// Process-local repository. Lists come back in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    users: RwLock<Vec<User>>,
    resumes: RwLock<Vec<Resume>>,
    jobs: RwLock<Vec<JobDescription>>,
    evaluations: RwLock<Vec<Evaluation>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_user(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_resume(&self, resume: Resume) -> Result<Resume, AppError> {
        self.resumes.write().await.push(resume.clone());
        Ok(resume)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.resumes.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes(&self) -> Result<Vec<Resume>, AppError> {
        Ok(self.resumes.read().await.clone())
    }

    async fn list_resumes_by_owner(&self, owner_id: Uuid) -> Result<Vec<Resume>, AppError> {
        Ok(self
            .resumes
            .read()
            .await
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_job(&self, job: JobDescription) -> Result<JobDescription, AppError> {
        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobDescription>, AppError> {
        Ok(self.jobs.read().await.clone())
    }

    async fn list_jobs_by_owner(&self, owner_id: Uuid) -> Result<Vec<JobDescription>, AppError> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|j| j.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn save_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation, AppError> {
        self.evaluations.write().await.push(evaluation.clone());
        Ok(evaluation)
    }

    async fn get_evaluation(&self, id: Uuid) -> Result<Option<Evaluation>, AppError> {
        Ok(self
            .evaluations
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list_evaluations_for_job(&self, job_id: Uuid) -> Result<Vec<Evaluation>, AppError> {
        Ok(self
            .evaluations
            .read()
            .await
            .iter()
            .filter(|e| e.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn list_evaluations_by_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> Result<Vec<Evaluation>, AppError> {
        let job_ids: Vec<Uuid> = self
            .jobs
            .read()
            .await
            .iter()
            .filter(|j| j.owner_id == recruiter_id)
            .map(|j| j.id)
            .collect();

        Ok(self
            .evaluations
            .read()
            .await
            .iter()
            .filter(|e| job_ids.contains(&e.job_id))
            .cloned()
            .collect())
    }

    async fn list_evaluations_by_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<Evaluation>, AppError> {
        let resume_ids: Vec<Uuid> = self
            .resumes
            .read()
            .await
            .iter()
            .filter(|r| r.owner_id == candidate_id)
            .map(|r| r.id)
            .collect();

        Ok(self
            .evaluations
            .read()
            .await
            .iter()
            .filter(|e| resume_ids.contains(&e.resume_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FitVerdict, Role};
    use chrono::Utc;

    fn make_user(email: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: "Test User".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn make_job(owner_id: Uuid) -> JobDescription {
        JobDescription {
            id: Uuid::new_v4(),
            owner_id,
            title: "Data Scientist".to_string(),
            company: "DataViz Solutions".to_string(),
            description: "Python and ML".to_string(),
            required_skills: vec!["Python".to_string()],
            preferred_skills: vec![],
            experience_level: "Senior".to_string(),
            created_at: Utc::now(),
        }
    }

    fn make_evaluation(resume_id: Uuid, job_id: Uuid) -> Evaluation {
        Evaluation {
            id: Uuid::new_v4(),
            resume_id,
            job_id,
            relevance_score: 42,
            fit_verdict: FitVerdict::Low,
            missing_skills: vec![],
            missing_certifications: vec![],
            missing_projects: vec![],
            feedback: "Low match".to_string(),
            hard_match_score: 50,
            soft_match_score: 30,
            evaluated_at: Utc::now(),
            job_title: "Data Scientist".to_string(),
            company: "DataViz Solutions".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryRepository::new();
        repo.insert_user(make_user("a@example.com", Role::Candidate))
            .await
            .unwrap();
        let err = repo
            .insert_user(make_user("A@example.com", Role::Evaluator))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_lists_preserve_insertion_order() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();
        let first = repo
            .insert_resume(Resume::new(owner, "A", "a@x", "a.txt", "one"))
            .await
            .unwrap();
        let second = repo
            .insert_resume(Resume::new(owner, "A", "a@x", "b.txt", "two"))
            .await
            .unwrap();
        repo.insert_resume(Resume::new(Uuid::new_v4(), "B", "b@x", "c.txt", "three"))
            .await
            .unwrap();

        let owned = repo.list_resumes_by_owner(owner).await.unwrap();
        let ids: Vec<Uuid> = owned.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(repo.list_resumes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_evaluations_scoped_by_recruiter_and_candidate() {
        let repo = InMemoryRepository::new();
        let recruiter = Uuid::new_v4();
        let other_recruiter = Uuid::new_v4();
        let candidate = Uuid::new_v4();

        let job = repo.insert_job(make_job(recruiter)).await.unwrap();
        let other_job = repo.insert_job(make_job(other_recruiter)).await.unwrap();
        let resume = repo
            .insert_resume(Resume::new(candidate, "C", "c@x", "c.txt", "Python"))
            .await
            .unwrap();
        let stranger = repo
            .insert_resume(Resume::new(Uuid::new_v4(), "D", "d@x", "d.txt", "Java"))
            .await
            .unwrap();

        repo.save_evaluation(make_evaluation(resume.id, job.id)).await.unwrap();
        repo.save_evaluation(make_evaluation(stranger.id, job.id)).await.unwrap();
        repo.save_evaluation(make_evaluation(resume.id, other_job.id)).await.unwrap();

        assert_eq!(repo.list_evaluations_by_recruiter(recruiter).await.unwrap().len(), 2);
        assert_eq!(repo.list_evaluations_by_candidate(candidate).await.unwrap().len(), 2);
        assert_eq!(repo.list_evaluations_for_job(other_job.id).await.unwrap().len(), 1);
        assert_eq!(repo.list_evaluations_for_job(job.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_lookups_return_none() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_resume(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.get_job(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.get_evaluation(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.find_user_by_email("nobody@x").await.unwrap().is_none());
    }
}
