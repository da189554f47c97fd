//! Three-phase discrete-event engine.
//!
//! Each loop iteration:
//! - **A-phase**: advance the clock to the earliest pending event.
//! - **B-phase**: execute every event bound to that instant, in queue order.
//! - **C-phase**: let the model start any conditional activity (idle stations
//!   with waiting entities), once per iteration.
//!
//! The loop stops when the clock reaches the horizon or nothing is pending.

use crate::context::SimContext;
use crate::error::SimError;
use crate::event::Event;
use std::fmt::Debug;
use tracing::{debug, trace};

/// Domain behaviour plugged into the engine.
///
/// `Event` is the model's closed set of event tags; models match on it
/// exhaustively in [`handle_event`](Self::handle_event).
pub trait SimModel {
    /// Event tag type.
    type Event: Copy + Debug;
    /// Value produced by [`finalize`](Self::finalize).
    type Output;
    /// Model error; engine failures convert into it.
    type Error: From<SimError>;

    /// Primes the run, e.g. schedules the first arrival. The clock is at zero.
    fn initialize(&mut self, ctx: &mut SimContext<Self::Event>) -> Result<(), Self::Error>;

    /// Executes one bound event whose time equals `ctx.now()`.
    fn handle_event(
        &mut self,
        ctx: &mut SimContext<Self::Event>,
        event: Event<Self::Event>,
    ) -> Result<(), Self::Error>;

    /// Starts conditional activities after all bound events of the instant ran.
    fn try_conditional_service(
        &mut self,
        ctx: &mut SimContext<Self::Event>,
    ) -> Result<(), Self::Error>;

    /// Aggregates the final state once the loop ends.
    fn finalize(&mut self, ctx: &SimContext<Self::Event>) -> Self::Output;
}

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    NotStarted,
    Running,
    Finished,
}

/// Drives a [`SimModel`] until the horizon.
pub struct Engine<M: SimModel> {
    model: M,
    ctx: SimContext<M::Event>,
    horizon: f64,
    phase: EnginePhase,
    iterations: u64,
    events_executed: u64,
}

impl<M: SimModel> Engine<M> {
    /// Creates an engine that will stop once the clock reaches `horizon`.
    ///
    /// A zero horizon is accepted and yields an empty run.
    ///
    /// # Errors
    /// `SimError::InvalidHorizon` for negative or non-finite horizons.
    pub fn new(model: M, horizon: f64) -> Result<Self, SimError> {
        if !horizon.is_finite() || horizon < 0.0 {
            return Err(SimError::InvalidHorizon(horizon));
        }
        Ok(Self {
            model,
            ctx: SimContext::new(),
            horizon,
            phase: EnginePhase::NotStarted,
            iterations: 0,
            events_executed: 0,
        })
    }

    /// Runs the simulation to completion and returns the model's output.
    ///
    /// An engine runs once; a second call fails with `SimError::AlreadyFinished`.
    pub fn run(&mut self) -> Result<M::Output, M::Error> {
        if self.phase == EnginePhase::Finished {
            return Err(SimError::AlreadyFinished.into());
        }

        self.phase = EnginePhase::Running;
        let outcome = self.run_loop();
        self.phase = EnginePhase::Finished;
        outcome?;

        debug!(
            clock = self.ctx.now(),
            iterations = self.iterations,
            events = self.events_executed,
            "simulation finished"
        );
        Ok(self.model.finalize(&self.ctx))
    }

    fn run_loop(&mut self) -> Result<(), M::Error> {
        self.ctx.reset();
        self.model.initialize(&mut self.ctx)?;

        while self.ctx.now() < self.horizon {
            // A-phase
            let Some(next) = self.ctx.peek_min_time() else {
                debug!(clock = self.ctx.now(), "event queue drained before horizon");
                break;
            };
            self.ctx.advance_to(next)?;
            trace!(clock = next, "A-phase");

            // B-phase
            self.run_b_events()?;

            // C-phase
            trace!(clock = next, "C-phase");
            self.model.try_conditional_service(&mut self.ctx)?;

            self.iterations += 1;
        }
        Ok(())
    }

    fn run_b_events(&mut self) -> Result<(), M::Error> {
        let now = self.ctx.now();
        while self.ctx.peek_min_time() == Some(now) {
            let Some(event) = self.ctx.pop_min() else {
                break;
            };
            trace!(clock = now, kind = ?event.kind(), "B-phase event");
            self.model.handle_event(&mut self.ctx, event)?;
            self.events_executed += 1;
        }
        Ok(())
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Number of completed A/B/C iterations.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Number of B-phase events executed.
    pub fn events_executed(&self) -> u64 {
        self.events_executed
    }

    /// Configured stop time.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// The simulation context (clock and pending events).
    pub fn context(&self) -> &SimContext<M::Event> {
        &self.ctx
    }

    /// The model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model, e.g. to adjust staffing before `run()`.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consumes the engine and returns the model.
    pub fn into_model(self) -> M {
        self.model
    }
}
