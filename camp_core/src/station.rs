//! Service stations: a FIFO queue in front of a single server.
//!
//! A station is `Idle` or `Busy`. The camp polls every idle station once per
//! engine iteration; a poll with a waiting survivor starts service and
//! schedules the completion event. The worker count only shortens the
//! sampled duration, it never lets two survivors be served at once.

use crate::camp::CampEvent;
use crate::error::CampError;
use crate::survivor::{Roster, SurvivorId};
use camp_env::{SimContext, Variate};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::trace;

/// Smallest duration a service may take.
///
/// Sampled durations below this (including negative normal draws) are floored
/// to it so a completion is always strictly after its start.
pub const MIN_SERVICE_DURATION: f64 = 1e-6;

/// The camp's stations, in polling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    Medical,
    Registration,
    /// Optional adult service (phone calls, messages home)
    Communication,
    /// Mandatory distribution of supplies
    Supplies,
    /// Pre-shelter allocation
    Accommodation,
    ChildShelter,
    AdultShelter,
}

impl StationKind {
    /// Every kind in the fixed polling order.
    pub const ALL: [StationKind; 7] = [
        StationKind::Medical,
        StationKind::Registration,
        StationKind::Communication,
        StationKind::Supplies,
        StationKind::Accommodation,
        StationKind::ChildShelter,
        StationKind::AdultShelter,
    ];

    /// Position in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn default_name(self) -> &'static str {
        match self {
            StationKind::Medical => "Medical Treatment",
            StationKind::Registration => "Registration",
            StationKind::Communication => "Communication Service",
            StationKind::Supplies => "Supplies Distribution",
            StationKind::Accommodation => "Accommodation Allocation",
            StationKind::ChildShelter => "Child Shelter",
            StationKind::AdultShelter => "Adult Shelter",
        }
    }
}

impl std::fmt::Display for StationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_name())
    }
}

/// How a station turns its sampled base duration into a service duration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Use the sample as is.
    #[default]
    Sampled,
    /// Ignore the sample and use a fixed duration.
    Fixed { minutes: f64 },
    /// Sample plus `minutes` for every family member beyond the survivor.
    PerFamilyMember { minutes: f64 },
}

impl DurationPolicy {
    fn apply(self, base: f64, family_size: u32) -> f64 {
        match self {
            DurationPolicy::Sampled => base,
            DurationPolicy::Fixed { minutes } => minutes,
            DurationPolicy::PerFamilyMember { minutes } => {
                base + minutes * f64::from(family_size.saturating_sub(1))
            }
        }
    }
}

/// Clamps a configured worker count to at least one.
pub fn clamp_workers(workers: i64) -> u32 {
    workers.clamp(1, i64::from(u32::MAX)) as u32
}

/// Scheduled duration for one service.
///
/// The policy is applied to `base`, the result divided by the worker count,
/// then floored to [`MIN_SERVICE_DURATION`]. NaN also floors.
pub fn service_duration(base: f64, policy: DurationPolicy, family_size: u32, workers: u32) -> f64 {
    let scaled = policy.apply(base, family_size) / f64::from(workers.max(1));
    if scaled.is_nan() {
        return MIN_SERVICE_DURATION;
    }
    scaled.max(MIN_SERVICE_DURATION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationState {
    Idle,
    Busy,
}

/// Per-station counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationStats {
    /// Survivors whose service has begun, including any still in service
    pub started_count: u64,
    pub served_count: u64,
    /// Sum of (completion − service start) over served survivors
    pub cumulative_service_time: f64,
    /// Sum of waits recorded at service start
    pub cumulative_wait_time: f64,
    pub max_queue_length: usize,
    pub max_wait_observed: f64,
}

impl StationStats {
    pub fn average_service_time(&self) -> f64 {
        if self.served_count == 0 {
            0.0
        } else {
            self.cumulative_service_time / self.served_count as f64
        }
    }

    /// Waits are recorded at service start, so they average over starts.
    pub fn average_wait_time(&self) -> f64 {
        if self.started_count == 0 {
            0.0
        } else {
            self.cumulative_wait_time / self.started_count as f64
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct InService {
    survivor: SurvivorId,
    started_at: f64,
}

/// What happened when a poll started a service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceStart {
    pub survivor: SurvivorId,
    pub duration: f64,
    /// Queue length left behind
    pub queue_len: usize,
}

/// A queue and a single server.
#[derive(Debug)]
pub struct Station {
    kind: StationKind,
    name: String,
    generator: Box<dyn Variate>,
    policy: DurationPolicy,
    workers: u32,
    queue: VecDeque<SurvivorId>,
    in_service: Option<InService>,
    stats: StationStats,
}

impl Station {
    /// Creates an idle station. `workers` below one is clamped to one.
    pub fn new(
        kind: StationKind,
        name: impl Into<String>,
        generator: Box<dyn Variate>,
        policy: DurationPolicy,
        workers: i64,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            generator,
            policy,
            workers: clamp_workers(workers),
            queue: VecDeque::new(),
            in_service: None,
            stats: StationStats::default(),
        }
    }

    pub fn kind(&self) -> StationKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn workers(&self) -> u32 {
        self.workers
    }

    pub fn policy(&self) -> DurationPolicy {
        self.policy
    }

    /// Changes the worker count; values below one are clamped.
    pub fn set_workers(&mut self, workers: i64) {
        self.workers = clamp_workers(workers);
    }

    /// Appends a survivor to the back of the queue.
    pub fn enqueue(&mut self, survivor: SurvivorId) {
        self.queue.push_back(survivor);
        self.stats.max_queue_length = self.stats.max_queue_length.max(self.queue.len());
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Survivors waiting, front first.
    pub fn queued(&self) -> impl Iterator<Item = SurvivorId> + '_ {
        self.queue.iter().copied()
    }

    /// Survivor currently being served.
    pub fn serving(&self) -> Option<SurvivorId> {
        self.in_service.map(|s| s.survivor)
    }

    pub fn state(&self) -> StationState {
        if self.in_service.is_some() {
            StationState::Busy
        } else {
            StationState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_service.is_some()
    }

    pub fn stats(&self) -> &StationStats {
        &self.stats
    }

    /// Idle to busy transition.
    ///
    /// Returns `Ok(None)` without touching anything when the station is busy
    /// or its queue is empty. Otherwise dequeues the head survivor, records its
    /// wait, and schedules `ServiceComplete` for this station.
    pub fn try_start_service(
        &mut self,
        ctx: &mut SimContext<CampEvent>,
        roster: &mut Roster,
    ) -> Result<Option<ServiceStart>, CampError> {
        if self.is_busy() {
            return Ok(None);
        }
        let Some(&id) = self.queue.front() else {
            return Ok(None);
        };

        let now = ctx.now();
        let survivor = roster.lookup_mut(id)?;
        let base = self.generator.sample();
        let duration = service_duration(base, self.policy, survivor.family_size(), self.workers);

        let wait = (now - survivor.arrival_time()).max(0.0);

        ctx.schedule_after(CampEvent::ServiceComplete(self.kind), duration)?;
        survivor.record_wait(wait);
        self.queue.pop_front();
        self.in_service = Some(InService {
            survivor: id,
            started_at: now,
        });
        self.stats.started_count += 1;
        self.stats.cumulative_wait_time += wait;
        self.stats.max_wait_observed = self.stats.max_wait_observed.max(wait);

        trace!(
            station = %self.name,
            survivor = %id,
            base,
            duration,
            workers = self.workers,
            "service started"
        );

        Ok(Some(ServiceStart {
            survivor: id,
            duration,
            queue_len: self.queue.len(),
        }))
    }

    /// Busy to idle transition, called when this station's completion fires.
    ///
    /// Returns the survivor that finished, or `None` if the station was idle.
    pub fn complete_service(&mut self, now: f64) -> Option<SurvivorId> {
        let done = self.in_service.take()?;
        self.stats.served_count += 1;
        self.stats.cumulative_service_time += now - done.started_at;
        Some(done.survivor)
    }
}
