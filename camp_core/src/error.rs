//! Error types for the rescue camp model.

use camp_env::SimError;
use thiserror::Error;

/// Errors raised while configuring or running the camp.
#[derive(Debug, Error)]
pub enum CampError {
    /// Failure inside the simulation framework
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Configured horizon is not a positive, finite number
    #[error("Invalid simulation horizon: {0} (must be > 0)")]
    InvalidHorizon(f64),

    /// Arrival distribution can produce gaps that do not advance the clock
    #[error("Invalid arrival process: {0}")]
    InvalidArrival(String),

    /// No branch of the pipeline matched the survivor
    #[error("No route from {from} for survivor {survivor}")]
    Unrouted { from: String, survivor: u64 },

    /// Pipeline definition is incomplete or inconsistent
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    /// Outcome weight table is unusable
    #[error("Invalid outcome weights: {0}")]
    InvalidOutcomeWeights(String),

    /// Population parameter out of range
    #[error("Invalid population parameter: {0}")]
    InvalidPopulation(String),

    /// Survivor id not present in the roster
    #[error("Unknown survivor #{0}")]
    UnknownSurvivor(u64),

    /// Config file could not be read
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CampError {
    /// Creates a pipeline error.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::InvalidPipeline(msg.into())
    }

    /// Creates a population error.
    pub fn population(msg: impl Into<String>) -> Self {
        Self::InvalidPopulation(msg.into())
    }
}
