// Matching engine: skill extraction, hard/soft scoring, verdict and gap analysis,
// feedback, and the orchestrator that runs them per (resume, job) pair.
// Everything here is synchronous and pure except the injected noise source.

pub mod feedback;
pub mod hard_match;
pub mod noise;
pub mod orchestrator;
pub mod skills;
pub mod soft_match;
pub mod verdict;

pub use orchestrator::{BatchProgress, EvaluationEngine};
