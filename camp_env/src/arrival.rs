//! Self-perpetuating arrival stream.

use crate::context::SimContext;
use crate::error::SimError;
use crate::variate::Variate;

/// Schedules the next arrival event using an inter-arrival generator.
///
/// The model calls [`generate_next_event`](Self::generate_next_event) once for
/// every arrival it consumes. The process has no cutoff of its own; the
/// engine's horizon check ends the stream.
#[derive(Debug)]
pub struct ArrivalProcess<K> {
    generator: Box<dyn Variate>,
    kind: K,
    scheduled: u64,
}

impl<K: Copy> ArrivalProcess<K> {
    /// Creates an arrival process emitting events tagged `kind`.
    pub fn new(generator: Box<dyn Variate>, kind: K) -> Self {
        Self {
            generator,
            kind,
            scheduled: 0,
        }
    }

    /// Samples a gap and schedules the next arrival at `now + gap`.
    ///
    /// Returns the absolute time of the scheduled arrival.
    ///
    /// # Errors
    /// `SimError::InvalidParameter` if the gap does not move the arrival past
    /// `now` (zero, negative, NaN, or too small to register at this clock).
    /// Nothing is scheduled in that case.
    pub fn generate_next_event(&mut self, ctx: &mut SimContext<K>) -> Result<f64, SimError> {
        let gap = self.generator.sample();
        let now = ctx.now();
        let at = now + gap;
        if at.is_nan() || at <= now {
            return Err(SimError::parameter(format!(
                "inter-arrival gap {gap} does not advance the clock past {now}"
            )));
        }
        ctx.schedule_at(self.kind, at)?;
        self.scheduled += 1;
        tracing::trace!(gap, at, "next arrival scheduled");
        Ok(at)
    }

    /// Number of arrivals scheduled so far.
    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }
}
