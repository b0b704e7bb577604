//! Demo data: two users, two jobs, two resumes. Skipped when any resume exists.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{JobDescription, Resume, Role, User};
use crate::store::Repository;

pub const DEMO_CANDIDATE_ID: Uuid = Uuid::from_u128(0x0000_0001_0000_4000_8000_0000_0000_0001);
pub const DEMO_EVALUATOR_ID: Uuid = Uuid::from_u128(0x0000_0002_0000_4000_8000_0000_0000_0002);
const DEMO_SECOND_CANDIDATE_ID: Uuid = Uuid::from_u128(0x0000_0003_0000_4000_8000_0000_0000_0003);

/// Returns `true` when data was inserted.
pub async fn seed_demo_data(repo: &dyn Repository) -> Result<bool, AppError> {
    if !repo.list_resumes().await?.is_empty() {
        info!("Repository already holds resumes; skipping demo seed");
        return Ok(false);
    }

    let now = Utc::now();

    for (id, email, name, role) in [
        (DEMO_CANDIDATE_ID, "student@innohire.com", "Alex Johnson", Role::Candidate),
        (DEMO_EVALUATOR_ID, "recruiter@innohire.com", "Sarah Wilson", Role::Evaluator),
    ] {
        if repo.find_user_by_email(email).await?.is_none() {
            repo.insert_user(User {
                id,
                email: email.to_string(),
                name: name.to_string(),
                role,
                created_at: now,
            })
            .await?;
        }
    }

    let jobs = [
        JobDescription {
            id: Uuid::new_v4(),
            owner_id: DEMO_EVALUATOR_ID,
            title: "Full Stack Developer".to_string(),
            company: "TechCorp Inc.".to_string(),
            description: "We are looking for a skilled Full Stack Developer to join our team. \
                Must have experience with React, Node.js, and database management."
                .to_string(),
            required_skills: strings(&["React", "Node.js", "JavaScript", "SQL", "REST APIs"]),
            preferred_skills: strings(&["TypeScript", "AWS", "Docker"]),
            experience_level: "Mid-level".to_string(),
            created_at: now,
        },
        JobDescription {
            id: Uuid::new_v4(),
            owner_id: DEMO_EVALUATOR_ID,
            title: "Data Scientist".to_string(),
            company: "DataViz Solutions".to_string(),
            description:
                "Looking for a Data Scientist with strong Python and machine learning background."
                    .to_string(),
            required_skills: strings(&["Python", "Machine Learning", "Data Analysis", "SQL"]),
            preferred_skills: strings(&["TensorFlow", "PyTorch", "AWS"]),
            experience_level: "Senior".to_string(),
            created_at: now,
        },
    ];
    for job in jobs {
        repo.insert_job(job).await?;
    }

    let resumes = [
        Resume {
            id: Uuid::new_v4(),
            owner_id: DEMO_CANDIDATE_ID,
            owner_name: "Alex Johnson".to_string(),
            owner_email: "student@innohire.com".to_string(),
            filename: "alex_johnson_resume.pdf".to_string(),
            content: "Experienced Full Stack Developer with 3 years of experience in React, \
                Node.js, JavaScript, HTML, CSS, and SQL. Built multiple web applications using \
                modern technologies."
                .to_string(),
            uploaded_at: now,
        },
        Resume {
            id: Uuid::new_v4(),
            owner_id: DEMO_SECOND_CANDIDATE_ID,
            owner_name: "Emily Chen".to_string(),
            owner_email: "emily.chen@email.com".to_string(),
            filename: "emily_chen_resume.pdf".to_string(),
            content: "Data Science graduate with experience in Python, Machine Learning, Data \
                Analysis, and SQL. Completed projects in predictive analytics and data \
                visualization."
                .to_string(),
            uploaded_at: now,
        },
    ];
    for resume in resumes {
        repo.insert_resume(resume).await?;
    }

    info!("Seeded demo data: 2 users, 2 jobs, 2 resumes");
    Ok(true)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
