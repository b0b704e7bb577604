//! Injectable randomness for the soft-match score.
//!
//! The engine carries an `Arc<dyn NoiseSource>`. Production uses
//! `UniformNoise`; tests pin the perturbation with `ZeroNoise` or `FixedNoise`.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::config::ConfigError;

/// Bound of the soft-match perturbation: draws fall in `[-10, +10]`.
pub const SOFT_MATCH_NOISE_AMPLITUDE: f64 = 10.0;

pub trait NoiseSource: Send + Sync {
    /// Next perturbation to add to a soft-match base score.
    fn perturbation(&self) -> f64;

    /// Short name for logs.
    fn label(&self) -> &'static str;
}

/// Uniform draws from `[-amplitude, +amplitude]`.
pub struct UniformNoise {
    rng: Mutex<StdRng>,
    amplitude: f64,
}

impl UniformNoise {
    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeds from the operating system. Fails if no entropy source is available.
    pub fn from_os() -> Result<Self, ConfigError> {
        let rng = StdRng::from_rng(OsRng)
            .map_err(|e| ConfigError::NoiseUnavailable(e.to_string()))?;
        Ok(Self::with_rng(rng))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            amplitude: SOFT_MATCH_NOISE_AMPLITUDE,
        }
    }
}

impl NoiseSource for UniformNoise {
    fn perturbation(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(-self.amplitude..=self.amplitude)
    }

    fn label(&self) -> &'static str {
        "uniform"
    }
}

/// Always 0. Makes soft matching a pure function of its two texts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn perturbation(&self) -> f64 {
        0.0
    }

    fn label(&self) -> &'static str {
        "none"
    }
}

/// Always the wrapped value. Test double for clamping behaviour.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(pub f64);

#[cfg(test)]
impl NoiseSource for FixedNoise {
    fn perturbation(&self) -> f64 {
        self.0
    }

    fn label(&self) -> &'static str {
        "fixed"
    }
}

/// Which noise source to build from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseKind {
    Uniform,
    None,
}

impl FromStr for NoiseKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(NoiseKind::Uniform),
            "none" | "zero" | "off" => Ok(NoiseKind::None),
            other => Err(ConfigError::UnknownNoiseSource(other.to_string())),
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseKind::Uniform => f.write_str("uniform"),
            NoiseKind::None => f.write_str("none"),
        }
    }
}

/// Builds the configured source. A seed only applies to `Uniform`.
pub fn build_noise_source(
    kind: NoiseKind,
    seed: Option<u64>,
) -> Result<Arc<dyn NoiseSource>, ConfigError> {
    Ok(match (kind, seed) {
        (NoiseKind::None, _) => Arc::new(ZeroNoise),
        (NoiseKind::Uniform, Some(seed)) => Arc::new(UniformNoise::seeded(seed)),
        (NoiseKind::Uniform, None) => Arc::new(UniformNoise::from_os()?),
    })
}
