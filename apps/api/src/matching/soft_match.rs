//! Soft-Match Scorer: coarse lexical overlap between resume and job text,
//! plus a bounded perturbation from the injected noise source.

use std::collections::HashSet;

use crate::matching::noise::NoiseSource;

/// Floor on the job word count used as the denominator.
pub const SOFT_MATCH_MIN_DENOMINATOR: usize = 50;
/// Resume words must be strictly longer than this (in chars) to count.
pub const SOFT_MATCH_MIN_WORD_CHARS: usize = 3;

/// Deterministic part of the soft-match score, in `[0.0, 100.0]`.
///
/// Both texts are lower-cased and split on whitespace; punctuation stays
/// attached to words. Every resume word (duplicates included) longer than
/// three chars that also occurs in the job text counts once.
pub fn soft_match_base(resume_text: &str, job_text: &str) -> f64 {
    let resume_lower = resume_text.to_lowercase();
    let job_lower = job_text.to_lowercase();

    let job_words: Vec<&str> = job_lower.split_whitespace().collect();
    let job_vocabulary: HashSet<&str> = job_words.iter().copied().collect();

    let overlap = resume_lower
        .split_whitespace()
        .filter(|word| word.chars().count() > SOFT_MATCH_MIN_WORD_CHARS)
        .filter(|word| job_vocabulary.contains(word))
        .count();

    let denominator = job_words.len().max(SOFT_MATCH_MIN_DENOMINATOR);
    ((overlap as f64 / denominator as f64) * 100.0).min(100.0)
}

/// Base score plus one perturbation, clamped to `[0, 100]` and rounded.
pub fn soft_match(resume_text: &str, job_text: &str, noise: &dyn NoiseSource) -> u32 {
    let score = soft_match_base(resume_text, job_text) + noise.perturbation();
    score.clamp(0.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::noise::{FixedNoise, UniformNoise, ZeroNoise};

    const JOB: &str = "Rust engineers build reliable services";

    #[test]
    fn test_base_score_uses_denominator_floor() {
        // build, reliable, services, rust → 4 / max(5, 50)
        let base = soft_match_base("I build reliable services in rust daily", JOB);
        assert!((base - 8.0).abs() < 1e-9, "base was {base}");
        assert_eq!(soft_match("I build reliable services in rust daily", JOB, &ZeroNoise), 8);
    }

    #[test]
    fn test_short_words_are_ignored() {
        // "the", "api", "and" are three chars or fewer
        assert_eq!(soft_match_base("the api and", "the api and"), 0.0);
    }

    #[test]
    fn test_punctuation_is_preserved() {
        assert_eq!(soft_match_base("rust,", "rust"), 0.0);
        assert!((soft_match_base("Rust.", "rust.") - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_resume_words_each_count() {
        assert!((soft_match_base("rust rust rust", "rust") - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_job_text_uses_actual_word_count() {
        let job = vec!["systems"; 100].join(" ");
        // one match over 100 job words
        assert!((soft_match_base("systems", &job) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_base_is_capped_at_100() {
        let resume = vec!["kubernetes"; 60].join(" ");
        assert_eq!(soft_match_base(&resume, "kubernetes"), 100.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(soft_match("", "", &ZeroNoise), 0);
        assert_eq!(soft_match("plenty of words here", "", &ZeroNoise), 0);
        assert_eq!(soft_match("", JOB, &ZeroNoise), 0);
    }

    #[test]
    fn test_perturbation_is_clamped() {
        assert_eq!(soft_match("", JOB, &FixedNoise(-10.0)), 0);
        let resume = vec!["kubernetes"; 60].join(" ");
        assert_eq!(soft_match(&resume, "kubernetes", &FixedNoise(10.0)), 100);
        assert_eq!(soft_match("I build reliable services in rust daily", JOB, &FixedNoise(10.0)), 18);
    }

    #[test]
    fn test_zero_noise_is_deterministic() {
        let resume = "Built reliable services and pipelines";
        let first = soft_match(resume, JOB, &ZeroNoise);
        let second = soft_match(resume, JOB, &ZeroNoise);
        assert_eq!(first, second);
    }

    #[test]
    fn test_uniform_noise_stays_within_ten_points_of_base() {
        let noise = UniformNoise::seeded(11);
        let resume = vec!["reliable"; 20].join(" ");
        let base = soft_match_base(&resume, JOB);
        for _ in 0..200 {
            let score = soft_match(&resume, JOB, &noise) as f64;
            assert!((score - base).abs() <= 10.5, "score {score} vs base {base}");
        }
    }
}
