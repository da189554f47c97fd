//! Seeded random-variate generators.
//!
//! Every generator owns its own `ChaCha8Rng` built from an explicit seed, so a
//! run is reproducible from its configuration alone. Nothing here reads the
//! wall clock.

use crate::error::SimError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A sampler with fixed parameters.
pub trait Variate: Debug + Send {
    /// Draws the next value.
    fn sample(&mut self) -> f64;
}

/// Derives an independent seed for one generator stream from a master seed.
///
/// Different `stream` values give unrelated seeds, so adding a generator never
/// shifts the draws of another one.
pub fn stream_seed(master: u64, stream: u64) -> u64 {
    // splitmix64 finalizer over the combined value
    let mut z = master
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(stream.wrapping_mul(0x517cc1b727220a95));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Uniform on `[min, max]`.
#[derive(Debug, Clone)]
pub struct Uniform {
    dist: rand_distr::Uniform<f64>,
    rng: ChaCha8Rng,
}

impl Uniform {
    /// Creates a uniform generator.
    ///
    /// `min == max` is allowed and always yields that value.
    pub fn new(min: f64, max: f64, seed: u64) -> Result<Self, SimError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SimError::parameter(format!(
                "uniform bounds must be finite with min <= max (got {min}, {max})"
            )));
        }
        Ok(Self {
            dist: rand_distr::Uniform::new_inclusive(min, max),
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }
}

impl Variate for Uniform {
    fn sample(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}

/// Normal distribution. Samples are unbounded and may be negative.
#[derive(Debug, Clone)]
pub struct Normal {
    dist: rand_distr::Normal<f64>,
    rng: ChaCha8Rng,
}

impl Normal {
    /// Creates a normal generator with the given mean and standard deviation.
    pub fn new(mean: f64, sd: f64, seed: u64) -> Result<Self, SimError> {
        if !mean.is_finite() || !sd.is_finite() || sd < 0.0 {
            return Err(SimError::parameter(format!(
                "normal needs finite mean and sd >= 0 (got mean={mean}, sd={sd})"
            )));
        }
        let dist = rand_distr::Normal::new(mean, sd)
            .map_err(|e| SimError::parameter(format!("normal: {e}")))?;
        Ok(Self {
            dist,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }
}

impl Variate for Normal {
    fn sample(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}

/// Negative-exponential with the given mean; used for inter-arrival gaps.
#[derive(Debug, Clone)]
pub struct NegativeExponential {
    dist: Exp<f64>,
    rng: ChaCha8Rng,
}

impl NegativeExponential {
    /// Creates a generator whose samples average `mean`.
    pub fn new(mean: f64, seed: u64) -> Result<Self, SimError> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(SimError::parameter(format!(
                "negative exponential mean must be > 0 (got {mean})"
            )));
        }
        let dist =
            Exp::new(1.0 / mean).map_err(|e| SimError::parameter(format!("exp: {e}")))?;
        Ok(Self {
            dist,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }
}

impl Variate for NegativeExponential {
    fn sample(&mut self) -> f64 {
        // Never zero or negative; whether the gap still moves a late clock is
        // checked by the arrival process.
        self.dist.sample(&mut self.rng).max(f64::MIN_POSITIVE)
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    /// Creates a constant generator.
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Variate for Constant {
    fn sample(&mut self) -> f64 {
        self.value
    }
}

/// Serializable generator description, built into a [`Variate`] with a seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariateSpec {
    /// Uniform on `[min, max]`
    Uniform { min: f64, max: f64 },
    /// Normal with mean and standard deviation
    Normal { mean: f64, sd: f64 },
    /// Negative exponential with mean
    NegExp { mean: f64 },
    /// Deterministic value
    Constant { value: f64 },
}

impl VariateSpec {
    /// Builds the generator.
    ///
    /// # Errors
    /// `SimError::InvalidParameter` when the parameters are unusable.
    pub fn build(&self, seed: u64) -> Result<Box<dyn Variate>, SimError> {
        Ok(match *self {
            VariateSpec::Uniform { min, max } => Box::new(Uniform::new(min, max, seed)?),
            VariateSpec::Normal { mean, sd } => Box::new(Normal::new(mean, sd, seed)?),
            VariateSpec::NegExp { mean } => Box::new(NegativeExponential::new(mean, seed)?),
            VariateSpec::Constant { value } => {
                if !value.is_finite() {
                    return Err(SimError::parameter(format!(
                        "constant must be finite (got {value})"
                    )));
                }
                Box::new(Constant::new(value))
            }
        })
    }

    /// Mean of the described distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            VariateSpec::Uniform { min, max } => (min + max) / 2.0,
            VariateSpec::Normal { mean, .. } => mean,
            VariateSpec::NegExp { mean } => mean,
            VariateSpec::Constant { value } => value,
        }
    }
}
