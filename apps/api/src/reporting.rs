//! Listing, filtering, sorting and CSV export of stored evaluations.

use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Evaluation, FitVerdict, JobDescription, Resume};

pub const CSV_HEADERS: [&str; 10] = [
    "Student Name",
    "Email",
    "Job Title",
    "Company",
    "Relevance Score",
    "Hard Match Score",
    "Soft Match Score",
    "Fit Verdict",
    "Missing Skills",
    "Evaluation Date",
];

const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";

/// An evaluation joined with the candidate who owns the scored resume.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub candidate_name: String,
    pub candidate_email: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Score,
    Date,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query string accepted by the listing and export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationQuery {
    pub job_id: Option<Uuid>,
    pub verdict: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationFilter {
    pub job_id: Option<Uuid>,
    pub verdict: Option<FitVerdict>,
    /// Lowercased needle matched against candidate name, email, job title and company.
    pub search: Option<String>,
}

impl EvaluationQuery {
    pub fn filter(&self) -> Result<EvaluationFilter, AppError> {
        let verdict = match self.verdict.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<FitVerdict>().map_err(AppError::Validation)?),
        };
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Ok(EvaluationFilter {
            job_id: self.job_id,
            verdict,
            search,
        })
    }
}

impl EvaluationFilter {
    pub fn matches(&self, view: &EvaluationView) -> bool {
        if self.job_id.is_some_and(|id| id != view.evaluation.job_id) {
            return false;
        }
        if self.verdict.is_some_and(|v| v != view.evaluation.fit_verdict) {
            return false;
        }
        match &self.search {
            None => true,
            Some(needle) => [
                view.candidate_name.as_str(),
                view.candidate_email.as_str(),
                view.evaluation.job_title.as_str(),
                view.evaluation.company.as_str(),
            ]
            .iter()
            .any(|hay| hay.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Attaches candidate name and email from the scored resume.
pub fn with_candidates(evaluations: Vec<Evaluation>, resumes: &[Resume]) -> Vec<EvaluationView> {
    let by_id: HashMap<Uuid, &Resume> = resumes.iter().map(|r| (r.id, r)).collect();

    evaluations
        .into_iter()
        .map(|evaluation| {
            let (candidate_name, candidate_email) = match by_id.get(&evaluation.resume_id) {
                Some(resume) => (resume.owner_name.clone(), resume.owner_email.clone()),
                None => (UNKNOWN_CANDIDATE.to_string(), String::new()),
            };
            EvaluationView {
                evaluation,
                candidate_name,
                candidate_email,
            }
        })
        .collect()
}

/// Filters then sorts. The sort is stable, so ties keep their stored order.
pub fn select(
    views: Vec<EvaluationView>,
    filter: &EvaluationFilter,
    sort_by: SortKey,
    order: SortOrder,
) -> Vec<EvaluationView> {
    let mut selected: Vec<EvaluationView> = views.into_iter().filter(|v| filter.matches(v)).collect();

    selected.sort_by(|a, b| {
        let ordering = compare(a, b, sort_by);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    selected
}

fn compare(a: &EvaluationView, b: &EvaluationView, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => a.evaluation.relevance_score.cmp(&b.evaluation.relevance_score),
        SortKey::Date => a.evaluation.evaluated_at.cmp(&b.evaluation.evaluated_at),
        SortKey::Name => a
            .candidate_name
            .to_lowercase()
            .cmp(&b.candidate_name.to_lowercase()),
    }
}

/// Per-job slice of the dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub evaluation_count: usize,
    pub average_score: u32,
}

/// Dashboard numbers over the evaluations a caller can see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationStats {
    pub total_evaluations: usize,
    pub high_matches: usize,
    /// Rounded mean relevance score; 0 when there are no evaluations.
    pub average_score: u32,
    pub active_jobs: usize,
    pub resume_count: usize,
    /// One entry per job in `jobs`, in the given order.
    pub jobs: Vec<JobSummary>,
}

fn average_score<'a>(scores: impl Iterator<Item = &'a Evaluation>) -> (usize, u32) {
    let (count, sum) = scores.fold((0usize, 0u64), |(n, total), e| {
        (n + 1, total + u64::from(e.relevance_score))
    });
    if count == 0 {
        return (0, 0);
    }
    (count, (sum as f64 / count as f64).round() as u32)
}

pub fn summarize(
    views: &[EvaluationView],
    jobs: &[JobDescription],
    resume_count: usize,
) -> EvaluationStats {
    let (total_evaluations, average) = average_score(views.iter().map(|v| &v.evaluation));
    let high_matches = views
        .iter()
        .filter(|v| v.evaluation.fit_verdict == FitVerdict::High)
        .count();

    let per_job = jobs
        .iter()
        .map(|job| {
            let (evaluation_count, average_score) = average_score(
                views
                    .iter()
                    .map(|v| &v.evaluation)
                    .filter(|e| e.job_id == job.id),
            );
            JobSummary {
                job_id: job.id,
                title: job.title.clone(),
                company: job.company.clone(),
                evaluation_count,
                average_score,
            }
        })
        .collect();

    EvaluationStats {
        total_evaluations,
        high_matches,
        average_score: average,
        active_jobs: jobs.len(),
        resume_count,
        jobs: per_job,
    }
}

/// Renders the export as CSV text with a header row.
pub fn to_csv(views: &[EvaluationView]) -> Result<String, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADERS).context("writing CSV header")?;

    for view in views {
        let e = &view.evaluation;
        let row: [String; 10] = [
            view.candidate_name.clone(),
            view.candidate_email.clone(),
            e.job_title.clone(),
            e.company.clone(),
            e.relevance_score.to_string(),
            e.hard_match_score.to_string(),
            e.soft_match_score.to_string(),
            e.fit_verdict.to_string(),
            e.missing_skills.join("; "),
            e.evaluated_at.format("%Y-%m-%d").to_string(),
        ];
        wtr.write_record(&row).context("writing CSV row")?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))?;
    Ok(String::from_utf8(bytes).context("CSV output is not UTF-8")?)
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("resume_evaluations_{}.csv", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn view(name: &str, score: u32, verdict: FitVerdict, day: u32) -> EvaluationView {
        EvaluationView {
            evaluation: Evaluation {
                id: Uuid::new_v4(),
                resume_id: Uuid::new_v4(),
                job_id: Uuid::nil(),
                relevance_score: score,
                fit_verdict: verdict,
                missing_skills: vec!["REST APIs".to_string(), "Docker".to_string()],
                missing_certifications: vec![],
                missing_projects: vec![],
                feedback: String::new(),
                hard_match_score: score,
                soft_match_score: score,
                evaluated_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
                job_title: "Full Stack Developer".to_string(),
                company: "TechCorp Inc.".to_string(),
            },
            candidate_name: name.to_string(),
            candidate_email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn names(views: &[EvaluationView]) -> Vec<&str> {
        views.iter().map(|v| v.candidate_name.as_str()).collect()
    }

    fn sample() -> Vec<EvaluationView> {
        vec![
            view("Bea", 62, FitVerdict::Medium, 2),
            view("alex", 88, FitVerdict::High, 1),
            view("Cleo", 30, FitVerdict::Low, 3),
            view("Dan", 62, FitVerdict::Medium, 4),
        ]
    }

    #[test]
    fn test_default_sort_is_score_descending_and_stable() {
        let query = EvaluationQuery::default();
        let out = select(sample(), &query.filter().unwrap(), query.sort_by, query.order);
        assert_eq!(names(&out), vec!["alex", "Bea", "Dan", "Cleo"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let out = select(sample(), &EvaluationFilter::default(), SortKey::Name, SortOrder::Asc);
        assert_eq!(names(&out), vec!["alex", "Bea", "Cleo", "Dan"]);
    }

    #[test]
    fn test_date_sort_ascending() {
        let out = select(sample(), &EvaluationFilter::default(), SortKey::Date, SortOrder::Asc);
        assert_eq!(names(&out), vec!["alex", "Bea", "Cleo", "Dan"]);
    }

    #[test]
    fn test_verdict_and_search_filters() {
        let query = EvaluationQuery {
            verdict: Some("medium".to_string()),
            search: Some("  DAN ".to_string()),
            ..Default::default()
        };
        let out = select(sample(), &query.filter().unwrap(), SortKey::Score, SortOrder::Desc);
        assert_eq!(names(&out), vec!["Dan"]);

        let by_company = EvaluationQuery {
            search: Some("techcorp".to_string()),
            ..Default::default()
        };
        assert_eq!(
            select(sample(), &by_company.filter().unwrap(), SortKey::Score, SortOrder::Desc).len(),
            4
        );
    }

    #[test]
    fn test_job_filter() {
        let mut views = sample();
        let other = Uuid::new_v4();
        views[0].evaluation.job_id = other;
        let filter = EvaluationFilter {
            job_id: Some(other),
            ..Default::default()
        };
        assert_eq!(names(&select(views, &filter, SortKey::Score, SortOrder::Desc)), vec!["Bea"]);
    }

    #[test]
    fn test_unknown_verdict_is_validation_error() {
        let query = EvaluationQuery {
            verdict: Some("excellent".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.filter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_with_candidates_joins_resume_owner() {
        let resume = Resume::new(Uuid::new_v4(), "Alex Johnson", "alex@x.io", "a.txt", "Rust");
        let mut evaluation = view("ignored", 50, FitVerdict::Medium, 1).evaluation;
        evaluation.resume_id = resume.id;
        let orphan = view("ignored", 10, FitVerdict::Low, 1).evaluation;

        let views = with_candidates(vec![evaluation, orphan], &[resume]);
        assert_eq!(views[0].candidate_name, "Alex Johnson");
        assert_eq!(views[0].candidate_email, "alex@x.io");
        assert_eq!(views[1].candidate_name, UNKNOWN_CANDIDATE);
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&[view("Alex", 88, FitVerdict::High, 5)]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Student Name,Email,Job Title,Company,Relevance Score,Hard Match Score,\
             Soft Match Score,Fit Verdict,Missing Skills,Evaluation Date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Alex,alex@example.com,Full Stack Developer,TechCorp Inc.,88,88,88,High,REST APIs; Docker,2024-03-05"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let mut v = view("Alex", 88, FitVerdict::High, 5);
        v.evaluation.company = "Acme, Inc.".to_string();
        let csv = to_csv(&[v]).unwrap();
        assert!(csv.contains("\"Acme, Inc.\""));
    }

    fn job(title: &str) -> JobDescription {
        JobDescription {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: title.to_string(),
            company: "TechCorp Inc.".to_string(),
            description: String::new(),
            required_skills: vec![],
            preferred_skills: vec![],
            experience_level: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_counts_and_rounds_averages() {
        let backend = job("Backend");
        let data = job("Data");
        let quiet = job("Quiet");
        let mut views = sample();
        // Bea 62, alex 88 on backend; Cleo 30, Dan 62 on data
        views[0].evaluation.job_id = backend.id;
        views[1].evaluation.job_id = backend.id;
        views[2].evaluation.job_id = data.id;
        views[3].evaluation.job_id = data.id;

        let stats = summarize(&views, &[backend.clone(), data, quiet], 7);

        assert_eq!(stats.total_evaluations, 4);
        assert_eq!(stats.high_matches, 1);
        // (62 + 88 + 30 + 62) / 4 = 60.5
        assert_eq!(stats.average_score, 61);
        assert_eq!(stats.active_jobs, 3);
        assert_eq!(stats.resume_count, 7);

        assert_eq!(stats.jobs[0].job_id, backend.id);
        assert_eq!(stats.jobs[0].evaluation_count, 2);
        assert_eq!(stats.jobs[0].average_score, 75);
        assert_eq!(stats.jobs[1].average_score, 46);
        assert_eq!(stats.jobs[2].evaluation_count, 0);
        assert_eq!(stats.jobs[2].average_score, 0);
    }

    #[test]
    fn test_summarize_empty_is_all_zero() {
        let stats = summarize(&[], &[], 0);
        assert_eq!(stats.total_evaluations, 0);
        assert_eq!(stats.high_matches, 0);
        assert_eq!(stats.average_score, 0);
        assert_eq!(stats.active_jobs, 0);
        assert!(stats.jobs.is_empty());
    }

    #[test]
    fn test_export_filename_uses_date() {
        let now = Utc.with_ymd_and_hms(2024, 11, 2, 8, 30, 0).unwrap();
        assert_eq!(export_filename(now), "resume_evaluations_2024-11-02.csv");
    }
}
