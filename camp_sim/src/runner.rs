//! Scenario runner - executes camp scenarios and checks run invariants.

use crate::scenarios::ScenarioId;
use camp_core::{
    simulate, AgeCategory, CampConfig, CampObserver, CampResults, HookResult, NoOpObserver,
    RescueCamp, StationKind, Survivor,
};
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether every invariant held
    pub passed: bool,

    /// Final simulation clock in minutes
    pub clock: f64,

    /// Survivors that arrived
    pub arrived: u64,

    /// Survivors that settled
    pub processed: u64,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Survivors still in the pipeline at the horizon
    pub in_flight: u64,

    /// Mean arrival-to-settlement time (min)
    pub average_time_in_camp: f64,

    /// Mean accumulated wait of settled survivors (min)
    pub average_wait: f64,

    /// Longest queue seen at any station
    pub max_queue_length: usize,

    /// Station with the longest queue
    pub bottleneck: Option<StationKind>,

    /// Failed observer hooks
    pub observer_failures: u64,
}

impl ScenarioMetrics {
    fn from_results(results: &CampResults) -> Self {
        let bottleneck = results
            .stations
            .iter()
            .max_by_key(|s| s.stats.max_queue_length)
            .filter(|s| s.stats.max_queue_length > 0);

        Self {
            in_flight: results.in_flight,
            average_time_in_camp: results.average_time_in_camp,
            average_wait: results.average_wait,
            max_queue_length: bottleneck.map_or(0, |s| s.stats.max_queue_length),
            bottleneck: bottleneck.map(|s| s.kind),
            observer_failures: results.observer_failures,
        }
    }
}

/// Records survivors routed to the shelter of the wrong age group.
#[derive(Debug, Default)]
pub struct SegregationCheck {
    violations: Vec<String>,
}

impl SegregationCheck {
    pub fn violations(&self) -> &[String] {
        &self.violations
    }
}

impl CampObserver for SegregationCheck {
    fn on_routed(&mut self, survivor: &Survivor, station: StationKind) -> HookResult {
        let wrong = match survivor.age_category() {
            AgeCategory::Child => {
                station == StationKind::AdultShelter || station == StationKind::Communication
            }
            AgeCategory::Adult => station == StationKind::ChildShelter,
        };
        if wrong {
            self.violations.push(format!(
                "{} survivor {} routed to {}",
                survivor.age_category(),
                survivor.id(),
                station
            ));
        }
        Ok(())
    }
}

/// Runs camp scenarios.
pub struct ScenarioRunner {
    /// Master seed
    seed: u64,

    /// Simulated minutes per run
    horizon: f64,

    /// Config the scenarios are applied on top of
    base: CampConfig,
}

impl ScenarioRunner {
    /// Creates a new scenario runner over the default camp.
    pub fn new(seed: u64) -> Self {
        let base = CampConfig::default();
        Self {
            seed,
            horizon: base.horizon,
            base,
        }
    }

    /// Sets the horizon.
    pub fn with_horizon(mut self, minutes: f64) -> Self {
        self.horizon = minutes;
        self
    }

    /// Sets the base config (e.g. loaded from a file).
    pub fn with_config(mut self, config: CampConfig) -> Self {
        self.horizon = config.horizon;
        self.base = config;
        self
    }

    /// Config a scenario runs with.
    pub fn config_for(&self, scenario: ScenarioId) -> CampConfig {
        let mut config = self.base.clone();
        scenario.apply(&mut config);
        config.seed = self.seed;
        config.horizon = self.horizon;
        config
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        let config = self.config_for(scenario);
        self.execute(scenario, &config, NoOpObserver).0
    }

    /// Runs `scenario` with `config` and `observer`, returning the final camp too.
    ///
    /// The camp is `None` when the run could not be set up or failed.
    pub fn execute<O: CampObserver>(
        &self,
        scenario: ScenarioId,
        config: &CampConfig,
        observer: O,
    ) -> (ScenarioResult, Option<RescueCamp<(SegregationCheck, O)>>) {
        info!("Starting scenario: {} (seed={})", scenario.name(), config.seed);
        debug!("  {}", scenario.description());

        let (results, camp) = match simulate(config, (SegregationCheck::default(), observer)) {
            Ok(done) => done,
            Err(e) => {
                warn!("Scenario {} aborted: {}", scenario.name(), e);
                let result = ScenarioResult {
                    scenario,
                    seed: config.seed,
                    passed: false,
                    clock: 0.0,
                    arrived: 0,
                    processed: 0,
                    failure_reason: Some(e.to_string()),
                    metrics: ScenarioMetrics::default(),
                };
                return (result, None);
            }
        };

        let failure_reason = check_invariants(scenario, &results, &camp).err();
        let result = ScenarioResult {
            scenario,
            seed: config.seed,
            passed: failure_reason.is_none(),
            clock: results.clock,
            arrived: results.total_arrived,
            processed: results.total_processed,
            failure_reason,
            metrics: ScenarioMetrics::from_results(&results),
        };
        (result, Some(camp))
    }
}

fn check_invariants<O: CampObserver>(
    scenario: ScenarioId,
    results: &CampResults,
    camp: &RescueCamp<(SegregationCheck, O)>,
) -> Result<(), String> {
    let all = camp.all_survivors();
    if results.total_arrived != all.len() as u64 {
        return Err(format!(
            "arrived {} but {} survivors recorded",
            results.total_arrived,
            all.len()
        ));
    }
    if results.total_processed > results.total_arrived {
        return Err("more survivors processed than arrived".to_string());
    }
    if results.in_flight + results.total_processed != results.total_arrived {
        return Err(format!(
            "conservation broken: {} in flight + {} processed != {} arrived",
            results.in_flight, results.total_processed, results.total_arrived
        ));
    }

    for s in all {
        if s.cumulative_wait() < 0.0 {
            return Err(format!("survivor {} has negative wait", s.id()));
        }
        match s.completion_time() {
            Some(done) if done <= s.arrival_time() => {
                return Err(format!(
                    "survivor {} completed at {:.3} but arrived at {:.3}",
                    s.id(),
                    done,
                    s.arrival_time()
                ));
            }
            Some(_) if !s.is_processed() => {
                return Err(format!("survivor {} completed but not processed", s.id()));
            }
            None if s.is_processed() => {
                return Err(format!("survivor {} processed without completion", s.id()));
            }
            _ => {}
        }
    }

    if let Some(violation) = camp.observer().0.violations().first() {
        return Err(violation.clone());
    }

    if scenario.is_overloaded() && results.in_flight == 0 {
        return Err("overloaded camp drained its queues".to_string());
    }
    Ok(())
}
