//! Observer hooks for reporting collaborators.
//!
//! Hooks run synchronously inside the engine's B and C phases. They only get
//! shared references, so they cannot touch the clock, the event queue or the
//! survivors. A hook that fails is logged and counted by the camp; the run
//! carries on.

use crate::camp::CampResults;
use crate::station::StationKind;
use crate::survivor::Survivor;

/// Result of a hook call.
pub type HookResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Notifications emitted by [`RescueCamp`](crate::camp::RescueCamp).
///
/// Every method defaults to doing nothing.
pub trait CampObserver {
    /// A survivor entered the camp.
    fn on_arrival(&mut self, _survivor: &Survivor) -> HookResult {
        Ok(())
    }

    /// A survivor was queued at `station`.
    fn on_routed(&mut self, _survivor: &Survivor, _station: StationKind) -> HookResult {
        Ok(())
    }

    /// A survivor finished service at `stage`.
    fn on_stage_complete(&mut self, _survivor: &Survivor, _stage: &str) -> HookResult {
        Ok(())
    }

    /// A station started serving; `queue_len` is what is left waiting.
    fn on_service_start(&mut self, _station: &str, _queue_len: usize) -> HookResult {
        Ok(())
    }

    /// A survivor left the pipeline.
    fn on_settlement(&mut self, _survivor: &Survivor) -> HookResult {
        Ok(())
    }

    /// The run finished.
    fn on_results(&mut self, _results: &CampResults, _processed: &[&Survivor]) -> HookResult {
        Ok(())
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl CampObserver for NoOpObserver {}

impl<O: CampObserver + ?Sized> CampObserver for Box<O> {
    fn on_arrival(&mut self, survivor: &Survivor) -> HookResult {
        (**self).on_arrival(survivor)
    }

    fn on_routed(&mut self, survivor: &Survivor, station: StationKind) -> HookResult {
        (**self).on_routed(survivor, station)
    }

    fn on_stage_complete(&mut self, survivor: &Survivor, stage: &str) -> HookResult {
        (**self).on_stage_complete(survivor, stage)
    }

    fn on_service_start(&mut self, station: &str, queue_len: usize) -> HookResult {
        (**self).on_service_start(station, queue_len)
    }

    fn on_settlement(&mut self, survivor: &Survivor) -> HookResult {
        (**self).on_settlement(survivor)
    }

    fn on_results(&mut self, results: &CampResults, processed: &[&Survivor]) -> HookResult {
        (**self).on_results(results, processed)
    }
}

/// Both observers are called, first then second; the first error is returned.
impl<A: CampObserver, B: CampObserver> CampObserver for (A, B) {
    fn on_arrival(&mut self, survivor: &Survivor) -> HookResult {
        let a = self.0.on_arrival(survivor);
        let b = self.1.on_arrival(survivor);
        a.and(b)
    }

    fn on_routed(&mut self, survivor: &Survivor, station: StationKind) -> HookResult {
        let a = self.0.on_routed(survivor, station);
        let b = self.1.on_routed(survivor, station);
        a.and(b)
    }

    fn on_stage_complete(&mut self, survivor: &Survivor, stage: &str) -> HookResult {
        let a = self.0.on_stage_complete(survivor, stage);
        let b = self.1.on_stage_complete(survivor, stage);
        a.and(b)
    }

    fn on_service_start(&mut self, station: &str, queue_len: usize) -> HookResult {
        let a = self.0.on_service_start(station, queue_len);
        let b = self.1.on_service_start(station, queue_len);
        a.and(b)
    }

    fn on_settlement(&mut self, survivor: &Survivor) -> HookResult {
        let a = self.0.on_settlement(survivor);
        let b = self.1.on_settlement(survivor);
        a.and(b)
    }

    fn on_results(&mut self, results: &CampResults, processed: &[&Survivor]) -> HookResult {
        let a = self.0.on_results(results, processed);
        let b = self.1.on_results(results, processed);
        a.and(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survivor::{AgeCategory, HealthCondition, SurvivorId, SurvivorProfile};

    #[derive(Default)]
    struct Counter {
        arrivals: usize,
        fail: bool,
    }

    impl CampObserver for Counter {
        fn on_arrival(&mut self, _survivor: &Survivor) -> HookResult {
            self.arrivals += 1;
            if self.fail {
                return Err("display unavailable".into());
            }
            Ok(())
        }
    }

    fn survivor() -> Survivor {
        Survivor::new(
            SurvivorId(1),
            0.0,
            SurvivorProfile {
                age: 20,
                age_category: AgeCategory::Adult,
                health: HealthCondition::Healthy,
                family_size: 1,
                wants_optional_service: false,
            },
        )
    }

    #[test]
    fn test_noop_accepts_everything() {
        let mut obs = NoOpObserver;
        let s = survivor();
        assert!(obs.on_arrival(&s).is_ok());
        assert!(obs.on_stage_complete(&s, "Registration").is_ok());
        assert!(obs.on_service_start("Registration", 0).is_ok());
    }

    #[test]
    fn test_pair_calls_both_even_on_failure() {
        let mut pair = (
            Counter {
                fail: true,
                ..Default::default()
            },
            Counter::default(),
        );
        let s = survivor();
        assert!(pair.on_arrival(&s).is_err());
        assert_eq!(pair.0.arrivals, 1);
        assert_eq!(pair.1.arrivals, 1);
    }

    #[test]
    fn test_boxed_observer_forwards() {
        let mut boxed: Box<dyn CampObserver> = Box::new(Counter::default());
        assert!(boxed.on_arrival(&survivor()).is_ok());
    }
}
