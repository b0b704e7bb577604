//! Verdict & Gap Analyzer: combines hard and soft scores into a relevance
//! score, classifies fit, and lists what the candidate is missing.

use serde::{Deserialize, Serialize};

use crate::models::FitVerdict;

pub const HARD_MATCH_WEIGHT: f64 = 0.6;
pub const SOFT_MATCH_WEIGHT: f64 = 0.4;

pub const HIGH_FIT_THRESHOLD: u32 = 75;
pub const MEDIUM_FIT_THRESHOLD: u32 = 50;

/// Below this relevance score project suggestions are attached.
pub const PROJECT_GAP_THRESHOLD: u32 = 70;

/// Certifications checked against the raw resume text.
pub const CERTIFICATION_REFERENCE: &[&str] = &["AWS Certified", "Google Cloud", "Microsoft Azure"];

pub const PROJECT_SUGGESTIONS: &[&str] = &["Portfolio Website", "Open Source Contribution"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub hard: f64,
    pub soft: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            hard: HARD_MATCH_WEIGHT,
            soft: SOFT_MATCH_WEIGHT,
        }
    }
}

/// Inclusive lower bounds for `High` and `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictThresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            high: HIGH_FIT_THRESHOLD,
            medium: MEDIUM_FIT_THRESHOLD,
        }
    }
}

impl VerdictThresholds {
    pub fn classify(&self, relevance_score: u32) -> FitVerdict {
        if relevance_score >= self.high {
            FitVerdict::High
        } else if relevance_score >= self.medium {
            FitVerdict::Medium
        } else {
            FitVerdict::Low
        }
    }
}

/// Everything the analyzer reads for one (resume, job) pair.
pub struct GapInputs<'a> {
    pub hard_match_score: u32,
    pub soft_match_score: u32,
    pub resume_skills: &'a [&'a str],
    pub required_skills: &'a [String],
    pub resume_text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub relevance_score: u32,
    pub fit_verdict: FitVerdict,
    pub missing_skills: Vec<String>,
    pub missing_certifications: Vec<String>,
    pub missing_projects: Vec<String>,
}

pub fn analyze(
    inputs: &GapInputs<'_>,
    weights: &ScoringWeights,
    thresholds: &VerdictThresholds,
) -> GapAnalysis {
    let relevance_score = relevance_score(inputs.hard_match_score, inputs.soft_match_score, weights);

    GapAnalysis {
        relevance_score,
        fit_verdict: thresholds.classify(relevance_score),
        missing_skills: missing_skills(inputs.resume_skills, inputs.required_skills),
        missing_certifications: missing_certifications(inputs.resume_text),
        missing_projects: missing_projects(relevance_score),
    }
}

/// `round(hard × w.hard + soft × w.soft)`, capped at 100.
pub fn relevance_score(hard_match_score: u32, soft_match_score: u32, weights: &ScoringWeights) -> u32 {
    let combined = hard_match_score as f64 * weights.hard + soft_match_score as f64 * weights.soft;
    combined.round().clamp(0.0, 100.0) as u32
}

/// Required skills that no resume skill contains (case-insensitive).
///
/// Only the required-inside-resume-skill direction is checked here, unlike
/// hard matching which accepts either direction. So a resume skill "SQL"
/// covers "PostgreSQL" for the hard score but still reports it missing.
/// Duplicates (ignoring case) are reported once, first spelling wins.
pub fn missing_skills<S: AsRef<str>>(resume_skills: &[S], required_skills: &[String]) -> Vec<String> {
    let resume_lower: Vec<String> = resume_skills
        .iter()
        .map(|s| s.as_ref().to_lowercase())
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for required in required_skills {
        let required_lower = required.to_lowercase();
        let covered = resume_lower.iter().any(|skill| skill.contains(&required_lower));
        let already_listed = missing.iter().any(|m| m.to_lowercase() == required_lower);
        if !covered && !already_listed {
            missing.push(required.clone());
        }
    }
    missing
}

/// Reference certifications not mentioned anywhere in the resume text.
pub fn missing_certifications(resume_text: &str) -> Vec<String> {
    let haystack = resume_text.to_lowercase();
    CERTIFICATION_REFERENCE
        .iter()
        .filter(|cert| !haystack.contains(&cert.to_lowercase()))
        .map(|cert| cert.to_string())
        .collect()
}

pub fn missing_projects(relevance_score: u32) -> Vec<String> {
    if relevance_score < PROJECT_GAP_THRESHOLD {
        PROJECT_SUGGESTIONS.iter().map(|p| p.to_string()).collect()
    } else {
        vec![]
    }
}
