use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::matching::noise::NoiseKind;
use crate::matching::verdict::{ScoringWeights, VerdictThresholds};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Setup defects. Raised at startup, never while scoring.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable '{key}' has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown soft-match noise source '{0}' (expected 'uniform' or 'none')")]
    UnknownNoiseSource(String),

    #[error("Soft-match noise source unavailable: {0}")]
    NoiseUnavailable(String),
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. The in-memory repository is used when absent.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub soft_match_noise: NoiseKind,
    pub soft_match_seed: Option<u64>,
    /// Artificial latency before each evaluation. Zero disables it.
    pub evaluation_delay: Duration,
    pub seed_demo_data: bool,
    pub max_upload_bytes: usize,
    pub scoring_weights: ScoringWeights,
    pub verdict_thresholds: VerdictThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            soft_match_noise: NoiseKind::Uniform,
            soft_match_seed: None,
            evaluation_delay: Duration::ZERO,
            seed_demo_data: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            scoring_weights: ScoringWeights::default(),
            verdict_thresholds: VerdictThresholds::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let delay_ms: u64 = parse_env("EVALUATION_DELAY_MS", 0)?;
        let scoring_weights = checked_weights(
            parse_env("SCORING_HARD_WEIGHT", defaults.scoring_weights.hard)?,
            parse_env("SCORING_SOFT_WEIGHT", defaults.scoring_weights.soft)?,
        )?;
        let verdict_thresholds = checked_thresholds(
            parse_env("FIT_HIGH_THRESHOLD", defaults.verdict_thresholds.high)?,
            parse_env("FIT_MEDIUM_THRESHOLD", defaults.verdict_thresholds.medium)?,
        )?;

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            soft_match_noise: match std::env::var("SOFT_MATCH_NOISE") {
                Ok(raw) => raw.parse()?,
                Err(_) => defaults.soft_match_noise,
            },
            soft_match_seed: parse_optional_env("SOFT_MATCH_SEED")?,
            evaluation_delay: Duration::from_millis(delay_ms),
            seed_demo_data: parse_env("SEED_DEMO_DATA", defaults.seed_demo_data)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            scoring_weights,
            verdict_thresholds,
        })
    }
}

/// Weights must be finite, non-negative, and not both zero.
fn checked_weights(hard: f64, soft: f64) -> Result<ScoringWeights, ConfigError> {
    for (key, value) in [("SCORING_HARD_WEIGHT", hard), ("SCORING_SOFT_WEIGHT", soft)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Invalid {
                key,
                value: value.to_string(),
                reason: "weight must be a finite, non-negative number".to_string(),
            });
        }
    }
    if hard + soft <= 0.0 {
        return Err(ConfigError::Invalid {
            key: "SCORING_HARD_WEIGHT",
            value: hard.to_string(),
            reason: "hard and soft weights cannot both be zero".to_string(),
        });
    }
    Ok(ScoringWeights { hard, soft })
}

/// Requires `medium <= high <= 100`.
fn checked_thresholds(high: u32, medium: u32) -> Result<VerdictThresholds, ConfigError> {
    if high > 100 {
        return Err(ConfigError::Invalid {
            key: "FIT_HIGH_THRESHOLD",
            value: high.to_string(),
            reason: "threshold cannot exceed 100".to_string(),
        });
    }
    if medium > high {
        return Err(ConfigError::Invalid {
            key: "FIT_MEDIUM_THRESHOLD",
            value: medium.to_string(),
            reason: format!("must not exceed FIT_HIGH_THRESHOLD ({high})"),
        });
    }
    Ok(VerdictThresholds { high, medium })
}

fn parse_env<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional_env(key)?.unwrap_or(default))
}

fn parse_optional_env<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_trimmed_number() {
        let port: u16 = parse_value("PORT", " 9090 ").unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_parse_value_reports_key_on_failure() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("PORT"), "{message}");
        assert!(message.contains("eighty"), "{message}");
    }

    #[test]
    fn test_defaults_disable_delay_and_cap_uploads_at_10mb() {
        let config = Config::default();
        assert!(config.evaluation_delay.is_zero());
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.database_url.is_none());
        assert_eq!(config.scoring_weights, ScoringWeights { hard: 0.6, soft: 0.4 });
        assert_eq!(config.verdict_thresholds, VerdictThresholds { high: 75, medium: 50 });
    }

    #[test]
    fn test_config_errors_surface_through_anyhow() {
        let err: anyhow::Error = "loud".parse::<NoiseKind>().unwrap_err().into();
        assert!(err.to_string().contains("loud"), "{err}");
    }

    #[test]
    fn test_checked_weights() {
        assert_eq!(
            checked_weights(0.7, 0.3).unwrap(),
            ScoringWeights { hard: 0.7, soft: 0.3 }
        );
        assert!(checked_weights(1.0, 0.0).is_ok());
        assert!(checked_weights(-0.1, 0.5).is_err());
        assert!(checked_weights(f64::NAN, 0.5).is_err());
        assert!(checked_weights(0.0, 0.0).is_err());
    }

    #[test]
    fn test_checked_thresholds() {
        assert_eq!(
            checked_thresholds(80, 60).unwrap(),
            VerdictThresholds { high: 80, medium: 60 }
        );
        assert!(checked_thresholds(70, 70).is_ok());
        let err = checked_thresholds(50, 75).unwrap_err();
        assert!(err.to_string().contains("FIT_MEDIUM_THRESHOLD"));
        assert!(checked_thresholds(101, 50).is_err());
    }
}
