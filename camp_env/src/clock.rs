//! Simulation clock.

use crate::error::SimError;

/// Holds the current simulated time.
///
/// Only the engine's A-phase moves the clock forward; everything else reads it
/// through [`SimContext::now`](crate::SimContext::now).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clock {
    now: f64,
}

impl Clock {
    /// Creates a clock at time zero.
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Returns the current simulated time.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Moves the clock to `t`.
    ///
    /// # Errors
    /// `SimError::ClockRegression` if `t` is earlier than `now()` or not finite.
    pub fn advance_to(&mut self, t: f64) -> Result<(), SimError> {
        if !t.is_finite() || t < self.now {
            return Err(SimError::ClockRegression {
                now: self.now,
                requested: t,
            });
        }
        self.now = t;
        Ok(())
    }

    /// Resets the clock to zero.
    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = Clock::new();
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::new();
        clock.advance_to(2.5).unwrap();
        assert_eq!(clock.now(), 2.5);

        // Same instant is allowed
        clock.advance_to(2.5).unwrap();
        assert_eq!(clock.now(), 2.5);
    }

    #[test]
    fn test_clock_rejects_regression() {
        let mut clock = Clock::new();
        clock.advance_to(10.0).unwrap();

        let err = clock.advance_to(9.0).unwrap_err();
        assert_eq!(
            err,
            SimError::ClockRegression {
                now: 10.0,
                requested: 9.0
            }
        );
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_clock_rejects_nan() {
        let mut clock = Clock::new();
        assert!(clock.advance_to(f64::NAN).is_err());
        assert!(clock.advance_to(f64::INFINITY).is_err());
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = Clock::new();
        clock.advance_to(42.0).unwrap();
        clock.reset();
        assert_eq!(clock.now(), 0.0);
    }
}
