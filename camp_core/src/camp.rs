//! The rescue camp model.
//!
//! [`RescueCamp`] plugs into [`camp_env::Engine`]: arrivals create survivors
//! and route them into the pipeline, service completions move them on, and
//! the C-phase polls every station in the fixed [`StationKind::ALL`] order.

use crate::config::CampConfig;
use crate::error::CampError;
use crate::observer::{CampObserver, HookResult, NoOpObserver};
use crate::outcome::OutcomeTable;
use crate::routing::{Pipeline, Source, Target};
use crate::station::{Station, StationKind, StationStats};
use crate::survivor::{PopulationSampler, Roster, Survivor, SurvivorId};
use camp_env::variate::stream_seed;
use camp_env::{ArrivalProcess, Engine, Event, SimContext, SimModel};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

const ARRIVAL_STREAM: u64 = 0;
const POPULATION_STREAM: u64 = 1;
const OUTCOME_STREAM: u64 = 2;
const STATION_STREAM_BASE: u64 = 10;

/// Event tags of the camp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampEvent {
    /// A survivor arrives
    Arrival,
    /// The survivor in service at this station is done
    ServiceComplete(StationKind),
}

/// Snapshot of one station at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub kind: StationKind,
    pub name: String,
    pub workers: u32,
    pub queue_length: usize,
    pub busy: bool,
    pub stats: StationStats,
}

/// Aggregated results of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampResults {
    pub clock: f64,
    pub total_arrived: u64,
    pub total_processed: u64,
    pub in_flight: u64,
    pub stations: Vec<StationReport>,
    /// Settled survivors per outcome bucket
    pub outcome_counts: BTreeMap<String, u64>,
    pub observer_failures: u64,
    /// Mean arrival-to-settlement time of processed survivors
    pub average_time_in_camp: f64,
    /// Mean accumulated wait of processed survivors
    pub average_wait: f64,
}

impl CampResults {
    pub fn station(&self, kind: StationKind) -> Option<&StationReport> {
        self.stations.iter().find(|s| s.kind == kind)
    }
}

/// Rescue camp pipeline model.
pub struct RescueCamp<O: CampObserver = NoOpObserver> {
    /// Indexed by `StationKind::index()`
    stations: Vec<Station>,
    outcomes: BTreeMap<StationKind, OutcomeTable>,
    pipeline: Pipeline,
    arrivals: ArrivalProcess<CampEvent>,
    population: PopulationSampler,
    outcome_rng: ChaCha8Rng,
    roster: Roster,
    in_flight: BTreeSet<SurvivorId>,
    processed: Vec<SurvivorId>,
    outcome_counts: BTreeMap<String, u64>,
    observer: O,
    observer_failures: u64,
}

impl<O: CampObserver> RescueCamp<O> {
    /// Builds the camp with the standard pipeline.
    pub fn new(config: &CampConfig, observer: O) -> Result<Self, CampError> {
        Self::with_pipeline(config, Pipeline::rescue_camp(), observer)
    }

    /// Builds the camp with a custom pipeline.
    ///
    /// The horizon is not checked here; it belongs to the engine.
    pub fn with_pipeline(
        config: &CampConfig,
        pipeline: Pipeline,
        observer: O,
    ) -> Result<Self, CampError> {
        pipeline.validate()?;
        let seed = config.seed;

        let mut stations = Vec::with_capacity(StationKind::ALL.len());
        let mut outcomes = BTreeMap::new();
        for kind in StationKind::ALL {
            let sc = config.station(kind);
            let generator = sc
                .service
                .build(stream_seed(seed, STATION_STREAM_BASE + kind.index() as u64))?;
            stations.push(Station::new(
                kind,
                sc.name.clone(),
                generator,
                sc.duration,
                sc.workers,
            ));
            if !sc.outcomes.is_empty() {
                outcomes.insert(kind, OutcomeTable::new(&sc.outcomes)?);
            }
        }

        let arrivals = ArrivalProcess::new(
            config.arrival.build(stream_seed(seed, ARRIVAL_STREAM))?,
            CampEvent::Arrival,
        );
        let population =
            PopulationSampler::new(config.population.clone(), stream_seed(seed, POPULATION_STREAM))?;

        Ok(Self {
            stations,
            outcomes,
            pipeline,
            arrivals,
            population,
            outcome_rng: ChaCha8Rng::seed_from_u64(stream_seed(seed, OUTCOME_STREAM)),
            roster: Roster::new(),
            in_flight: BTreeSet::new(),
            processed: Vec::new(),
            outcome_counts: BTreeMap::new(),
            observer,
            observer_failures: 0,
        })
    }

    /// Changes a station's staffing; values below one are clamped.
    pub fn set_workers(&mut self, kind: StationKind, workers: i64) {
        self.stations[kind.index()].set_workers(workers);
    }

    /// Every survivor that arrived, by id.
    pub fn all_survivors(&self) -> &[Survivor] {
        self.roster.as_slice()
    }

    /// Settled survivors in settlement order.
    pub fn processed_survivors(&self) -> impl Iterator<Item = &Survivor> + '_ {
        self.processed.iter().filter_map(|&id| self.roster.get(id))
    }

    /// Statistics of every station, in polling order.
    pub fn station_stats(&self) -> impl Iterator<Item = (StationKind, &StationStats)> + '_ {
        self.stations.iter().map(|s| (s.kind(), s.stats()))
    }

    pub fn station(&self, kind: StationKind) -> &Station {
        &self.stations[kind.index()]
    }

    pub fn survivor(&self, id: SurvivorId) -> Option<&Survivor> {
        self.roster.get(id)
    }

    /// Survivors that arrived but have not settled.
    pub fn in_flight(&self) -> impl Iterator<Item = SurvivorId> + '_ {
        self.in_flight.iter().copied()
    }

    pub fn total_arrived(&self) -> u64 {
        self.roster.len() as u64
    }

    pub fn total_processed(&self) -> u64 {
        self.processed.len() as u64
    }

    pub fn outcome_counts(&self) -> &BTreeMap<String, u64> {
        &self.outcome_counts
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_failures(&self) -> u64 {
        self.observer_failures
    }

    /// Draws an outcome bucket from `station`'s table for `id`.
    ///
    /// Returns the existing outcome, without drawing or counting, if one was
    /// already assigned, and `None` if the station has no outcome table.
    pub fn assign_outcome(
        &mut self,
        id: SurvivorId,
        station: StationKind,
    ) -> Result<Option<String>, CampError> {
        let survivor = self.roster.lookup_mut(id)?;
        if let Some(existing) = survivor.assigned_outcome() {
            return Ok(Some(existing.to_string()));
        }
        let Some(table) = self.outcomes.get(&station) else {
            return Ok(None);
        };
        let name = table.pick(&mut self.outcome_rng).to_string();
        survivor.assign_outcome(name.clone());
        *self.outcome_counts.entry(name.clone()).or_insert(0) += 1;
        Ok(Some(name))
    }

    fn handle_arrival(&mut self, ctx: &mut SimContext<CampEvent>) -> Result<(), CampError> {
        let now = ctx.now();
        let id = self.roster.next_id();
        let profile = self.population.sample();
        self.roster.push(Survivor::new(id, now, profile));
        self.in_flight.insert(id);
        debug!(survivor = %id, clock = now, "arrival");

        let result = self.observer.on_arrival(self.roster.lookup(id)?);
        report_hook(&mut self.observer_failures, "on_arrival", result);

        self.arrivals.generate_next_event(ctx)?;
        self.dispatch(id, Source::Arrival, now)
    }

    fn handle_completion(
        &mut self,
        kind: StationKind,
        ctx: &mut SimContext<CampEvent>,
    ) -> Result<(), CampError> {
        let now = ctx.now();
        let station = &mut self.stations[kind.index()];
        let Some(id) = station.complete_service(now) else {
            warn!(station = %kind, clock = now, "completion for an idle station");
            return Ok(());
        };

        let result = self
            .observer
            .on_stage_complete(self.roster.lookup(id)?, station.name());
        report_hook(&mut self.observer_failures, "on_stage_complete", result);

        self.dispatch(id, Source::Station(kind), now)
    }

    /// Sends `id` to its next station, or settles it.
    fn dispatch(&mut self, id: SurvivorId, from: Source, now: f64) -> Result<(), CampError> {
        let target = self.pipeline.route(from, self.roster.lookup(id)?)?;
        match target {
            Target::Station(next) => {
                self.stations[next.index()].enqueue(id);
                let result = self.observer.on_routed(self.roster.lookup(id)?, next);
                report_hook(&mut self.observer_failures, "on_routed", result);
                Ok(())
            }
            Target::Settle => self.settle(id, from, now),
        }
    }

    fn settle(&mut self, id: SurvivorId, from: Source, now: f64) -> Result<(), CampError> {
        if let Source::Station(kind) = from {
            self.assign_outcome(id, kind)?;
        }
        let survivor = self.roster.lookup_mut(id)?;
        if !survivor.settle(now) {
            return Ok(());
        }
        self.in_flight.remove(&id);
        self.processed.push(id);
        debug!(
            survivor = %id,
            clock = now,
            outcome = self.roster.lookup(id)?.assigned_outcome().unwrap_or("-"),
            "settled"
        );

        let result = self.observer.on_settlement(self.roster.lookup(id)?);
        report_hook(&mut self.observer_failures, "on_settlement", result);
        Ok(())
    }

    /// Aggregates the current state as if the run ended at `clock`.
    pub fn results_at(&self, clock: f64) -> CampResults {
        let processed: Vec<&Survivor> = self.processed_survivors().collect();
        let n = processed.len();
        let mean = |total: f64| if n == 0 { 0.0 } else { total / n as f64 };

        CampResults {
            clock,
            total_arrived: self.total_arrived(),
            total_processed: self.total_processed(),
            in_flight: self.in_flight.len() as u64,
            stations: self
                .stations
                .iter()
                .map(|s| StationReport {
                    kind: s.kind(),
                    name: s.name().to_string(),
                    workers: s.workers(),
                    queue_length: s.queue_len(),
                    busy: s.is_busy(),
                    stats: s.stats().clone(),
                })
                .collect(),
            outcome_counts: self.outcome_counts.clone(),
            observer_failures: self.observer_failures,
            average_time_in_camp: mean(processed.iter().map(|s| s.time_in_camp(clock)).sum()),
            average_wait: mean(processed.iter().map(|s| s.cumulative_wait()).sum()),
        }
    }
}

impl<O: CampObserver> SimModel for RescueCamp<O> {
    type Event = CampEvent;
    type Output = CampResults;
    type Error = CampError;

    fn initialize(&mut self, ctx: &mut SimContext<CampEvent>) -> Result<(), CampError> {
        self.arrivals.generate_next_event(ctx)?;
        Ok(())
    }

    fn handle_event(
        &mut self,
        ctx: &mut SimContext<CampEvent>,
        event: Event<CampEvent>,
    ) -> Result<(), CampError> {
        match *event.kind() {
            CampEvent::Arrival => self.handle_arrival(ctx),
            CampEvent::ServiceComplete(kind) => self.handle_completion(kind, ctx),
        }
    }

    fn try_conditional_service(
        &mut self,
        ctx: &mut SimContext<CampEvent>,
    ) -> Result<(), CampError> {
        for station in self.stations.iter_mut() {
            if let Some(start) = station.try_start_service(ctx, &mut self.roster)? {
                let result = self.observer.on_service_start(station.name(), start.queue_len);
                report_hook(&mut self.observer_failures, "on_service_start", result);
            }
        }
        Ok(())
    }

    fn finalize(&mut self, ctx: &SimContext<CampEvent>) -> CampResults {
        let mut results = self.results_at(ctx.now());

        let processed: Vec<&Survivor> = self
            .processed
            .iter()
            .filter_map(|&id| self.roster.get(id))
            .collect();
        let result = self.observer.on_results(&results, &processed);
        report_hook(&mut self.observer_failures, "on_results", result);
        results.observer_failures = self.observer_failures;

        info!(
            clock = results.clock,
            arrived = results.total_arrived,
            processed = results.total_processed,
            in_flight = results.in_flight,
            "camp run finished"
        );
        results
    }
}

/// Logs and counts a failed hook. The run continues either way.
fn report_hook(failures: &mut u64, hook: &str, result: HookResult) {
    if let Err(e) = result {
        *failures += 1;
        warn!(hook, error = %e, "observer hook failed");
    }
}

/// Validates `config`, runs a camp to its horizon and returns the results
/// along with the final model for inspection and export.
pub fn simulate<O: CampObserver>(
    config: &CampConfig,
    observer: O,
) -> Result<(CampResults, RescueCamp<O>), CampError> {
    config.validate()?;
    let camp = RescueCamp::new(config, observer)?;
    run_camp(camp, config.horizon)
}

/// Runs an already built camp until `horizon`.
pub fn run_camp<O: CampObserver>(
    camp: RescueCamp<O>,
    horizon: f64,
) -> Result<(CampResults, RescueCamp<O>), CampError> {
    let mut engine = Engine::new(camp, horizon)?;
    let results = engine.run()?;
    Ok((results, engine.into_model()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survivor::AgeCategory;
    use approx::assert_relative_eq;
    use camp_env::{SimError, VariateSpec};
    use proptest::prelude::*;

    fn single_station(config: &mut CampConfig, kind: StationKind) -> Pipeline {
        config.stations.get_mut(kind).outcomes.clear();
        Pipeline::new()
            .branch(Source::Arrival, crate::routing::Predicate::Always, Target::Station(kind))
            .branch(Source::Station(kind), crate::routing::Predicate::Always, Target::Settle)
    }

    fn check_conservation<O: CampObserver>(results: &CampResults, camp: &RescueCamp<O>) {
        assert_eq!(results.total_arrived, camp.all_survivors().len() as u64);
        assert_eq!(results.total_processed, camp.processed_survivors().count() as u64);
        assert!(results.total_processed <= results.total_arrived);
        assert_eq!(
            results.in_flight + results.total_processed,
            results.total_arrived
        );
        for s in camp.all_survivors() {
            let in_flight = camp.in_flight().any(|id| id == s.id());
            assert_ne!(in_flight, s.is_processed(), "survivor {} in both or neither", s.id());
        }
    }

    /// Records routing decisions by age category.
    #[derive(Default)]
    struct RouteLog {
        routed: Vec<(AgeCategory, StationKind)>,
        service_starts: usize,
        results_seen: Option<(u64, u64)>,
    }

    impl CampObserver for RouteLog {
        fn on_routed(&mut self, survivor: &Survivor, station: StationKind) -> HookResult {
            self.routed.push((survivor.age_category(), station));
            Ok(())
        }

        fn on_service_start(&mut self, _station: &str, _queue_len: usize) -> HookResult {
            self.service_starts += 1;
            Ok(())
        }

        fn on_results(&mut self, results: &CampResults, processed: &[&Survivor]) -> HookResult {
            assert_eq!(processed.len() as u64, results.total_processed);
            self.results_seen = Some((results.total_arrived, results.total_processed));
            Ok(())
        }
    }

    struct Failing;

    impl CampObserver for Failing {
        fn on_arrival(&mut self, _survivor: &Survivor) -> HookResult {
            Err("screen disconnected".into())
        }
    }

    #[test]
    fn test_default_run_conserves_survivors() {
        let (results, camp) = simulate(&CampConfig::default(), NoOpObserver).unwrap();

        assert!(results.total_arrived > 0);
        assert!(results.total_processed > 0);
        assert!(results.clock >= 480.0);
        check_conservation(&results, &camp);

        let settled: u64 = results.outcome_counts.values().sum();
        assert_eq!(settled, results.total_processed);
    }

    #[test]
    fn test_completion_after_arrival() {
        let mut config = CampConfig::default();
        config.set_arrival_mean(4.0);
        let (_, camp) = simulate(&config, NoOpObserver).unwrap();

        for s in camp.all_survivors() {
            assert!(s.cumulative_wait() >= 0.0);
            if let Some(done) = s.completion_time() {
                assert!(done > s.arrival_time());
                assert!(s.assigned_outcome().is_some());
            }
        }
    }

    #[test]
    fn test_outcome_assignment_idempotent() {
        let (_, mut camp) = simulate(&CampConfig::default(), NoOpObserver).unwrap();
        let s = camp.processed_survivors().next().unwrap();
        let id = s.id();
        let first = s.assigned_outcome().map(str::to_string);
        let counts = camp.outcome_counts().clone();
        let shelter = match s.age_category() {
            AgeCategory::Child => StationKind::ChildShelter,
            AgeCategory::Adult => StationKind::AdultShelter,
        };

        let again = camp.assign_outcome(id, shelter).unwrap();

        assert_eq!(again, first);
        assert_eq!(camp.outcome_counts(), &counts);
    }

    #[test]
    fn test_shelters_segregated_by_age() {
        let mut config = CampConfig {
            horizon: 1000.0,
            arrival: VariateSpec::Constant { value: 1.0 },
            ..Default::default()
        };
        config.seed = 2024;
        let (results, camp) = simulate(&config, RouteLog::default()).unwrap();

        assert_eq!(results.total_arrived, 1000);
        let log = camp.observer();
        let mut children = 0;
        for &(category, station) in &log.routed {
            match category {
                AgeCategory::Child => {
                    children += 1;
                    assert_ne!(station, StationKind::AdultShelter);
                    assert_ne!(station, StationKind::Communication);
                }
                AgeCategory::Adult => assert_ne!(station, StationKind::ChildShelter),
            }
        }
        assert!(children > 0);

        for kind in [StationKind::ChildShelter, StationKind::AdultShelter] {
            for id in camp.station(kind).queued() {
                let category = camp.survivor(id).unwrap().age_category();
                assert_eq!(category == AgeCategory::Child, kind == StationKind::ChildShelter);
            }
        }
        assert_eq!(log.results_seen, Some((results.total_arrived, results.total_processed)));
        assert!(log.service_starts > 0);
    }

    #[test]
    fn test_saturated_queue_grows() {
        let mut lengths = Vec::new();
        for horizon in [25.0, 50.0, 75.0, 100.0, 125.0] {
            let mut config = CampConfig {
                horizon,
                arrival: VariateSpec::Constant { value: 5.0 },
                ..Default::default()
            };
            let pipeline = single_station(&mut config, StationKind::Registration);
            config.stations.registration.service = VariateSpec::Constant { value: 10.0 };
            config.set_workers(StationKind::Registration, 1);

            let camp = RescueCamp::with_pipeline(&config, pipeline, NoOpObserver).unwrap();
            let (results, _) = run_camp(camp, horizon).unwrap();
            let report = results.station(StationKind::Registration).unwrap();
            lengths.push(report.queue_length);
        }

        for pair in lengths.windows(2) {
            assert!(pair[0] < pair[1], "queue lengths {:?}", lengths);
        }
    }

    #[test]
    fn test_workers_halve_service_time() {
        for (workers, expected) in [(1, 12.0), (2, 6.0)] {
            let mut config = CampConfig {
                horizon: 150.0,
                arrival: VariateSpec::Constant { value: 100.0 },
                ..Default::default()
            };
            let pipeline = single_station(&mut config, StationKind::Registration);
            config.stations.registration.service = VariateSpec::Constant { value: 12.0 };
            config.set_workers(StationKind::Registration, workers);

            let camp = RescueCamp::with_pipeline(&config, pipeline, NoOpObserver).unwrap();
            let (results, camp) = run_camp(camp, 150.0).unwrap();

            assert_eq!(results.total_processed, 1);
            let stats = camp.station(StationKind::Registration).stats();
            assert_eq!(stats.served_count, 1);
            assert_eq!(stats.average_service_time(), expected);
            let s = camp.processed_survivors().next().unwrap();
            assert_eq!(s.completion_time(), Some(100.0 + expected));
        }
    }

    #[test]
    fn test_zero_workers_clamped() {
        let mut config = CampConfig::default();
        config.set_workers(StationKind::Medical, 0);
        let camp = RescueCamp::new(&config, NoOpObserver).unwrap();
        assert_eq!(camp.station(StationKind::Medical).workers(), 1);
    }

    #[test]
    fn test_zero_horizon() {
        let config = CampConfig {
            horizon: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            simulate(&config, NoOpObserver),
            Err(CampError::InvalidHorizon(_))
        ));

        let camp = RescueCamp::new(&config, RouteLog::default()).unwrap();
        let (results, camp) = run_camp(camp, 0.0).unwrap();
        assert_eq!(results.total_arrived, 0);
        assert_eq!(results.total_processed, 0);
        assert_eq!(camp.observer().results_seen, Some((0, 0)));
    }

    #[test]
    fn test_non_advancing_arrivals_rejected() {
        for arrival in [
            VariateSpec::Constant { value: 0.0 },
            VariateSpec::Uniform { min: 0.0, max: 0.0 },
            VariateSpec::Normal { mean: 20.0, sd: 5.0 },
        ] {
            let config = CampConfig {
                horizon: 10.0,
                arrival,
                ..Default::default()
            };
            assert!(matches!(
                simulate(&config, NoOpObserver),
                Err(CampError::InvalidArrival(_))
            ));
        }
    }

    #[test]
    fn test_non_advancing_arrivals_stop_unvalidated_run() {
        // Built without validate(): the engine must fail instead of spinning at one instant
        for arrival in [
            VariateSpec::Constant { value: 0.0 },
            VariateSpec::Uniform { min: -2.0, max: -1.0 },
        ] {
            let config = CampConfig {
                horizon: 10.0,
                arrival,
                ..Default::default()
            };
            let camp = RescueCamp::new(&config, NoOpObserver).unwrap();
            assert!(matches!(
                run_camp(camp, config.horizon),
                Err(CampError::Sim(SimError::InvalidParameter(_)))
            ));
        }
    }

    #[test]
    fn test_station_wait_includes_service_in_progress() {
        let mut config = CampConfig {
            horizon: 30.0,
            arrival: VariateSpec::Constant { value: 5.0 },
            ..Default::default()
        };
        let pipeline = single_station(&mut config, StationKind::Registration);
        config.stations.registration.service = VariateSpec::Constant { value: 10.0 };
        config.set_workers(StationKind::Registration, 1);

        let camp = RescueCamp::with_pipeline(&config, pipeline, NoOpObserver).unwrap();
        let (_, camp) = run_camp(camp, 30.0).unwrap();
        let station = camp.station(StationKind::Registration);
        let stats = station.stats();

        assert!(station.is_busy());
        assert_eq!(stats.started_count, stats.served_count + 1);
        assert!(stats.cumulative_wait_time > 0.0);
        assert_relative_eq!(
            stats.average_wait_time(),
            stats.cumulative_wait_time / stats.started_count as f64
        );
    }

    #[test]
    fn test_runs_are_deterministic() {
        let config = CampConfig::default();
        let (a, _) = simulate(&config, NoOpObserver).unwrap();
        let (b, _) = simulate(&config, NoOpObserver).unwrap();
        assert_eq!(a, b);

        let other = CampConfig {
            seed: 7,
            ..Default::default()
        };
        let (c, _) = simulate(&other, NoOpObserver).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_failing_observer_does_not_stop_run() {
        let (results, _) = simulate(&CampConfig::default(), Failing).unwrap();
        let (baseline, _) = simulate(&CampConfig::default(), NoOpObserver).unwrap();

        assert_eq!(results.observer_failures, results.total_arrived);
        assert_eq!(results.total_processed, baseline.total_processed);
    }

    #[test]
    fn test_invalid_pipeline_rejected() {
        let pipeline = Pipeline::new().branch(
            Source::Arrival,
            crate::routing::Predicate::IsChild,
            Target::Station(StationKind::ChildShelter),
        );
        assert!(matches!(
            RescueCamp::with_pipeline(&CampConfig::default(), pipeline, NoOpObserver),
            Err(CampError::InvalidPipeline(_))
        ));
    }

    #[test]
    fn test_bad_outcome_weights_rejected() {
        let mut config = CampConfig::default();
        config.stations.adult_shelter.outcomes[0].weight = 0.9;
        assert!(matches!(
            RescueCamp::new(&config, NoOpObserver),
            Err(CampError::InvalidOutcomeWeights(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_conservation_any_seed(seed in 0u64..10_000, mean in 2.0f64..30.0) {
            let mut config = CampConfig { seed, ..Default::default() };
            config.set_arrival_mean(mean);
            let (results, camp) = simulate(&config, NoOpObserver).unwrap();

            prop_assert_eq!(results.total_arrived, camp.all_survivors().len() as u64);
            prop_assert_eq!(results.in_flight + results.total_processed, results.total_arrived);
            for s in camp.processed_survivors() {
                prop_assert!(s.completion_time().unwrap() > s.arrival_time());
                prop_assert!(s.completion_time().unwrap() <= results.clock);
            }
        }
    }
}
