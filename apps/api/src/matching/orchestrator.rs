//! Evaluation Orchestrator: runs the matching pipeline for one pair or a batch.
//!
//! Flow per pair: extract_skills → hard_match → soft_match → analyze →
//!                synthesize → stamp id/timestamp/job display fields.
//!
//! Batches run strictly sequentially in input order. Progress is reported
//! after every item and cancellation is checked before every item.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, ConfigError};
use crate::matching::feedback::synthesize;
use crate::matching::hard_match::hard_match;
use crate::matching::noise::{build_noise_source, NoiseSource};
use crate::matching::skills::extract_skills;
use crate::matching::soft_match::soft_match;
use crate::matching::verdict::{analyze, GapAnalysis, GapInputs, ScoringWeights, VerdictThresholds};
use crate::models::{Evaluation, JobDescription, Resume};

/// All computed values for a pair, before identity and timestamp are stamped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub resume_skills: Vec<&'static str>,
    pub hard_match_score: u32,
    pub soft_match_score: u32,
    pub gaps: GapAnalysis,
    pub feedback: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

/// Result of a batch run. `evaluations` is always an input-ordered prefix of
/// the batch; it is the whole batch unless `cancelled` is set.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub evaluations: Vec<Evaluation>,
    pub total: usize,
    pub cancelled: bool,
}

/// Progress observer invoked once per completed batch item.
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(BatchProgress) + Send);

#[derive(Clone)]
pub struct EvaluationEngine {
    noise: Arc<dyn NoiseSource>,
    weights: ScoringWeights,
    thresholds: VerdictThresholds,
    delay: Duration,
}

impl fmt::Debug for EvaluationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationEngine")
            .field("noise", &self.noise.label())
            .field("weights", &self.weights)
            .field("thresholds", &self.thresholds)
            .field("delay", &self.delay)
            .finish()
    }
}

impl EvaluationEngine {
    pub fn new(noise: Arc<dyn NoiseSource>) -> Self {
        Self {
            noise,
            weights: ScoringWeights::default(),
            thresholds: VerdictThresholds::default(),
            delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let noise = build_noise_source(config.soft_match_noise, config.soft_match_seed)?;
        info!(
            "Evaluation engine: noise={} seed={:?} delay={:?} weights={:?} thresholds={:?}",
            noise.label(),
            config.soft_match_seed,
            config.evaluation_delay,
            config.scoring_weights,
            config.verdict_thresholds
        );
        Ok(Self::new(noise)
            .with_delay(config.evaluation_delay)
            .with_weights(config.scoring_weights)
            .with_thresholds(config.verdict_thresholds))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_thresholds(mut self, thresholds: VerdictThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Runs every scoring stage once. Synchronous; only the noise source varies.
    pub fn score(&self, resume: &Resume, job: &JobDescription) -> Scorecard {
        let resume_skills = extract_skills(&resume.content);
        let hard_match_score = hard_match(&resume_skills, &job.required_skills);
        let soft_match_score = soft_match(&resume.content, &job.description, self.noise.as_ref());

        let gaps = analyze(
            &GapInputs {
                hard_match_score,
                soft_match_score,
                resume_skills: &resume_skills,
                required_skills: &job.required_skills,
                resume_text: &resume.content,
            },
            &self.weights,
            &self.thresholds,
        );
        let feedback = synthesize(gaps.relevance_score, &gaps.missing_skills);

        debug!(
            "Scored resume {} vs job {}: hard={} soft={} relevance={} verdict={}",
            resume.id, job.id, hard_match_score, soft_match_score, gaps.relevance_score, gaps.fit_verdict
        );

        Scorecard {
            resume_skills,
            hard_match_score,
            soft_match_score,
            gaps,
            feedback,
        }
    }

    /// Scores one pair and stamps a fresh id and the current time.
    pub async fn evaluate(&self, resume: &Resume, job: &JobDescription) -> Evaluation {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let card = self.score(resume, job);
        stamp(resume, job, card)
    }

    /// Evaluates `resumes` against `job` one at a time, in order.
    ///
    /// `on_progress` receives `(completed, total)` after each item: `completed`
    /// runs 1..=N and `total` is always N. A cancelled token stops the batch
    /// before the next item starts.
    pub async fn evaluate_batch(
        &self,
        resumes: &[Resume],
        job: &JobDescription,
        mut on_progress: Option<ProgressCallback<'_>>,
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        let total = resumes.len();
        let mut evaluations = Vec::with_capacity(total);
        info!("Batch evaluation of {total} resumes against job {} started", job.id);

        for resume in resumes {
            if cancel.is_cancelled() {
                warn!(
                    "Batch evaluation for job {} cancelled after {}/{}",
                    job.id,
                    evaluations.len(),
                    total
                );
                return BatchOutcome {
                    evaluations,
                    total,
                    cancelled: true,
                };
            }

            let evaluation = self.evaluate(resume, job).await;
            evaluations.push(evaluation);

            if let Some(callback) = on_progress.as_mut() {
                callback(BatchProgress {
                    completed: evaluations.len(),
                    total,
                });
            }
        }

        info!("Batch evaluation for job {} finished ({total} resumes)", job.id);
        BatchOutcome {
            evaluations,
            total,
            cancelled: false,
        }
    }
}

fn stamp(resume: &Resume, job: &JobDescription, card: Scorecard) -> Evaluation {
    let Scorecard {
        hard_match_score,
        soft_match_score,
        gaps,
        feedback,
        ..
    } = card;

    Evaluation {
        id: Uuid::new_v4(),
        resume_id: resume.id,
        job_id: job.id,
        relevance_score: gaps.relevance_score,
        fit_verdict: gaps.fit_verdict,
        missing_skills: gaps.missing_skills,
        missing_certifications: gaps.missing_certifications,
        missing_projects: gaps.missing_projects,
        feedback,
        hard_match_score,
        soft_match_score,
        evaluated_at: Utc::now(),
        job_title: job.title.clone(),
        company: job.company.clone(),
    }
}
