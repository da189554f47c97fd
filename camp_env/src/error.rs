//! Error types for the simulation framework.

use thiserror::Error;

/// Errors raised by the clock, the event queue, the generators and the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The clock was asked to move backwards.
    #[error("Clock regression: now={now}, requested={requested}")]
    ClockRegression { now: f64, requested: f64 },

    /// An event was scheduled before the current time (or at a non-finite time).
    #[error("Event scheduled in the past: now={now}, at={at}")]
    ScheduleInPast { now: f64, at: f64 },

    /// Simulation horizon is negative or not finite.
    #[error("Invalid simulation horizon: {0}")]
    InvalidHorizon(f64),

    /// Generator constructed with unusable parameters.
    #[error("Invalid distribution parameter: {0}")]
    InvalidParameter(String),

    /// `run()` called on an engine that already finished.
    #[error("Engine already finished")]
    AlreadyFinished,
}

impl SimError {
    /// Creates an invalid-parameter error.
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
