//! Rescue Camp Simulation Framework
//!
//! A small, single-threaded discrete-event framework built around the
//! three-phase method:
//!
//! - **Clock / EventQueue**: the current time and a min-time queue with
//!   first-scheduled-first-served tie-breaking.
//! - **SimContext**: the clock and queue of one run, lent by `&mut` to every
//!   component instead of living in a global.
//! - **Variates**: seeded uniform, normal, negative-exponential and constant
//!   generators.
//! - **ArrivalProcess**: a self-perpetuating arrival stream.
//! - **Engine**: the A/B/C loop, generic over a [`SimModel`].
//!
//! The only source of nondeterminism is the generators, and every generator
//! takes an explicit seed, so a run is a pure function of its configuration.
//!
//! # Example
//!
//! ```ignore
//! use camp_env::{Engine, SimModel};
//!
//! let mut engine = Engine::new(my_model, 480.0)?;
//! let output = engine.run()?;
//! ```

mod arrival;
mod clock;
mod context;
mod engine;
mod error;
mod event;
pub mod variate;

pub use arrival::ArrivalProcess;
pub use clock::Clock;
pub use context::SimContext;
pub use engine::{Engine, EnginePhase, SimModel};
pub use error::SimError;
pub use event::{Event, EventQueue};
pub use variate::{Variate, VariateSpec};
