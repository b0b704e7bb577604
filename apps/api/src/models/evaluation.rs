use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categorical fit classification derived from the relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitVerdict {
    High,
    Medium,
    Low,
}

impl FitVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            FitVerdict::High => "High",
            FitVerdict::Medium => "Medium",
            FitVerdict::Low => "Low",
        }
    }
}

impl fmt::Display for FitVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitVerdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(FitVerdict::High),
            "medium" => Ok(FitVerdict::Medium),
            "low" => Ok(FitVerdict::Low),
            other => Err(format!("unknown fit verdict '{other}'")),
        }
    }
}

/// The result of scoring one resume against one job.
///
/// Created once by the evaluation engine and never mutated. A re-evaluation
/// produces a new record with a fresh `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub relevance_score: u32, // 0..=100
    pub fit_verdict: FitVerdict,
    pub missing_skills: Vec<String>,
    pub missing_certifications: Vec<String>,
    pub missing_projects: Vec<String>,
    pub feedback: String,
    pub hard_match_score: u32, // 0..=100
    pub soft_match_score: u32, // 0..=100
    pub evaluated_at: DateTime<Utc>,
    // Denormalized from the job for display without a lookup
    pub job_title: String,
    pub company: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_verdict_serializes_as_capitalized_name() {
        assert_eq!(serde_json::to_string(&FitVerdict::High).unwrap(), r#""High""#);
        assert_eq!(serde_json::to_string(&FitVerdict::Low).unwrap(), r#""Low""#);
    }

    #[test]
    fn test_fit_verdict_parses_case_insensitively() {
        assert_eq!("medium".parse::<FitVerdict>().unwrap(), FitVerdict::Medium);
        assert_eq!("HIGH".parse::<FitVerdict>().unwrap(), FitVerdict::High);
        assert!("excellent".parse::<FitVerdict>().is_err());
    }
}
