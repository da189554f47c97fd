//! Rescue Camp Model
//!
//! Survivors arrive at a camp and move through a pipeline of service
//! stations: medical treatment for children and the injured, registration,
//! an optional communication service for adults, supplies, accommodation,
//! and finally a child or adult shelter where they are assigned a home.
//!
//! - [`survivor`]: survivors, the roster and population sampling
//! - [`station`]: queue + single-server stations with worker scaling
//! - [`routing`]: the branching pipeline
//! - [`outcome`]: weighted shelter outcomes
//! - [`observer`]: hooks for reporters and exporters
//! - [`config`]: serde configuration with the reference defaults
//! - [`camp`]: the [`camp_env::SimModel`] tying it together
//!
//! ```ignore
//! use camp_core::{simulate, CampConfig, NoOpObserver};
//!
//! let (results, camp) = simulate(&CampConfig::default(), NoOpObserver)?;
//! println!("{} of {} settled", results.total_processed, results.total_arrived);
//! ```

pub mod camp;
pub mod config;
pub mod error;
pub mod observer;
pub mod outcome;
pub mod routing;
pub mod station;
pub mod survivor;

pub use camp::{run_camp, simulate, CampEvent, CampResults, RescueCamp, StationReport};
pub use config::{CampConfig, PopulationConfig, StationConfig, StationsConfig};
pub use error::CampError;
pub use observer::{CampObserver, HookResult, NoOpObserver};
pub use outcome::{OutcomeTable, OutcomeWeight};
pub use routing::{Branch, Pipeline, Predicate, Source, Target};
pub use station::{
    DurationPolicy, ServiceStart, Station, StationKind, StationState, StationStats,
    MIN_SERVICE_DURATION,
};
pub use survivor::{
    AgeCategory, HealthCondition, PopulationSampler, Roster, Survivor, SurvivorId,
    SurvivorProfile,
};
