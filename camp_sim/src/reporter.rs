//! Console reporting through `tracing`.

use camp_core::{CampObserver, CampResults, HookResult, StationKind, Survivor};
use tracing::{debug, info};

/// Observer that narrates the run and prints the final report.
///
/// Per-event lines and per-survivor detail go to `debug`, the summary to `info`.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    arrivals: u64,
    settlements: u64,
    service_starts: u64,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn settlements(&self) -> u64 {
        self.settlements
    }

    pub fn service_starts(&self) -> u64 {
        self.service_starts
    }
}

impl CampObserver for ConsoleReporter {
    fn on_arrival(&mut self, survivor: &Survivor) -> HookResult {
        self.arrivals += 1;
        debug!(
            "[{:>7.2}] Survivor {} arrived: age {} ({}), {}, family of {}",
            survivor.arrival_time(),
            survivor.id(),
            survivor.age(),
            survivor.age_category(),
            survivor.health(),
            survivor.family_size()
        );
        Ok(())
    }

    fn on_routed(&mut self, survivor: &Survivor, station: StationKind) -> HookResult {
        debug!("          {} -> {}", survivor.id(), station);
        Ok(())
    }

    fn on_stage_complete(&mut self, survivor: &Survivor, stage: &str) -> HookResult {
        debug!("          {} finished {}", survivor.id(), stage);
        Ok(())
    }

    fn on_service_start(&mut self, station: &str, queue_len: usize) -> HookResult {
        self.service_starts += 1;
        debug!("          {} busy, {} waiting", station, queue_len);
        Ok(())
    }

    fn on_settlement(&mut self, survivor: &Survivor) -> HookResult {
        self.settlements += 1;
        debug!(
            "          {} settled in {} after {:.2} min",
            survivor.id(),
            survivor.assigned_outcome().unwrap_or("-"),
            survivor.completion_time().unwrap_or_default() - survivor.arrival_time()
        );
        Ok(())
    }

    fn on_results(&mut self, results: &CampResults, processed: &[&Survivor]) -> HookResult {
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!("Simulation ended at {:.2} min", results.clock);
        info!(
            "Survivors: {} arrived, {} settled, {} still in camp",
            results.total_arrived, results.total_processed, results.in_flight
        );

        for s in processed {
            debug!(
                "  {} {:>3} {:<5} {:<7} wait {:>7.2} home {}",
                s.id(),
                s.age(),
                s.age_category(),
                s.health(),
                s.cumulative_wait(),
                s.assigned_outcome().unwrap_or("-")
            );
        }

        info!("Stations:");
        for station in &results.stations {
            info!(
                "  {:<26} workers {:>2} | served {:>4} | avg service {:>6.2} | avg wait {:>7.2} | max queue {:>3} | queued {:>3}",
                station.name,
                station.workers,
                station.stats.served_count,
                station.stats.average_service_time(),
                station.stats.average_wait_time(),
                station.stats.max_queue_length,
                station.queue_length
            );
        }

        if !results.outcome_counts.is_empty() {
            info!("Homes:");
            for (home, count) in &results.outcome_counts {
                info!("  {:<26} {:>4}", home, count);
            }
        }

        info!("Average time in camp: {:.2} min", results.average_time_in_camp);
        info!("Average waiting time: {:.2} min", results.average_wait);
        if results.observer_failures > 0 {
            info!("Observer failures: {}", results.observer_failures);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camp_core::{simulate, CampConfig};

    #[test]
    fn test_reporter_counts_match_results() {
        let (results, camp) = simulate(&CampConfig::default(), ConsoleReporter::new()).unwrap();
        let reporter = camp.observer();

        assert_eq!(reporter.arrivals(), results.total_arrived);
        assert_eq!(reporter.settlements(), results.total_processed);
        assert!(reporter.service_starts() >= results.total_processed);
        assert_eq!(results.observer_failures, 0);
    }
}
