//! Rescue Camp Simulator
//!
//! Collaborators around the camp model:
//! - [`ConsoleReporter`]: narrates a run through `tracing`
//! - [`exporter`]: survivor CSV and JSON snapshots
//! - [`scenarios`]: named staffing and load configurations
//! - [`ScenarioRunner`]: runs scenarios and checks run invariants
//!
//! # Usage
//!
//! ```ignore
//! use camp_sim::{ScenarioRunner, scenarios::ScenarioId};
//!
//! let result = ScenarioRunner::new(42).run(ScenarioId::Surge);
//! assert!(result.passed);
//! ```

pub mod exporter;
mod reporter;
mod runner;
pub mod scenarios;

pub use exporter::{write_survivors_csv, CampExport};
pub use reporter::ConsoleReporter;
pub use runner::{ScenarioMetrics, ScenarioResult, ScenarioRunner, SegregationCheck};
