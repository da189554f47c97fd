//! Simulation context passed by reference to every component.

use crate::clock::Clock;
use crate::error::SimError;
use crate::event::{Event, EventQueue};

/// The shared state of one simulation run: its clock and pending events.
///
/// There is no global clock. Each run owns a `SimContext` and lends it out as
/// `&mut` to stations, arrival processes and the model, so several runs can
/// live side by side in one process.
///
/// Only the engine advances the clock or consumes events; components can read
/// the time and schedule future events.
#[derive(Debug)]
pub struct SimContext<K> {
    clock: Clock,
    events: EventQueue<K>,
}

impl<K> SimContext<K> {
    /// Creates a context at time zero with no pending events.
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            events: EventQueue::new(),
        }
    }

    /// Returns the current simulated time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Schedules `kind` at absolute time `at`.
    ///
    /// # Errors
    /// `SimError::ScheduleInPast` if `at` is earlier than `now()` or not finite.
    pub fn schedule_at(&mut self, kind: K, at: f64) -> Result<(), SimError> {
        let now = self.clock.now();
        if !at.is_finite() || at < now {
            return Err(SimError::ScheduleInPast { now, at });
        }
        self.events.add(kind, at);
        Ok(())
    }

    /// Schedules `kind` at `now() + delay` and returns the absolute time.
    pub fn schedule_after(&mut self, kind: K, delay: f64) -> Result<f64, SimError> {
        let at = self.clock.now() + delay;
        self.schedule_at(kind, at)?;
        Ok(at)
    }

    /// Time of the earliest pending event.
    pub fn peek_min_time(&self) -> Option<f64> {
        self.events.peek_min_time()
    }

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Clock back to zero and every pending event dropped.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.events.clear();
    }

    pub(crate) fn advance_to(&mut self, t: f64) -> Result<(), SimError> {
        self.clock.advance_to(t)
    }

    pub(crate) fn pop_min(&mut self) -> Option<Event<K>> {
        self.events.pop_min()
    }
}

impl<K> Default for SimContext<K> {
    fn default() -> Self {
        Self::new()
    }
}
