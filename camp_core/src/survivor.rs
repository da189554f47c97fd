//! Survivors: the entities flowing through the camp.

use crate::config::PopulationConfig;
use crate::error::CampError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Monotonic survivor identifier, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurvivorId(pub u64);

impl std::fmt::Display for SurvivorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeCategory {
    Child,
    Adult,
}

impl std::fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgeCategory::Child => write!(f, "CHILD"),
            AgeCategory::Adult => write!(f, "ADULT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthCondition {
    Healthy,
    Injured,
}

impl std::fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthCondition::Healthy => write!(f, "HEALTHY"),
            HealthCondition::Injured => write!(f, "INJURED"),
        }
    }
}

/// Randomly drawn attributes of a new survivor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivorProfile {
    pub age: u32,
    pub age_category: AgeCategory,
    pub health: HealthCondition,
    pub family_size: u32,
    /// Coin flip for the optional service; only honoured for adults.
    pub wants_optional_service: bool,
}

/// A survivor and its bookkeeping.
///
/// Timing fields only move forward: the wait total accumulates, the
/// completion time and the outcome are each set at most once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Survivor {
    id: SurvivorId,
    age: u32,
    age_category: AgeCategory,
    health: HealthCondition,
    family_size: u32,
    arrival_time: f64,
    completion_time: Option<f64>,
    cumulative_wait: f64,
    requests_optional_service: bool,
    assigned_outcome: Option<String>,
    processed: bool,
}

impl Survivor {
    /// Creates a survivor arriving at `arrival_time`.
    pub fn new(id: SurvivorId, arrival_time: f64, profile: SurvivorProfile) -> Self {
        Self {
            id,
            age: profile.age,
            age_category: profile.age_category,
            health: profile.health,
            family_size: profile.family_size.max(1),
            arrival_time,
            completion_time: None,
            cumulative_wait: 0.0,
            requests_optional_service: profile.age_category == AgeCategory::Adult
                && profile.wants_optional_service,
            assigned_outcome: None,
            processed: false,
        }
    }

    pub fn id(&self) -> SurvivorId {
        self.id
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn age_category(&self) -> AgeCategory {
        self.age_category
    }

    pub fn health(&self) -> HealthCondition {
        self.health
    }

    /// Household size including the survivor (1 for individuals).
    pub fn family_size(&self) -> u32 {
        self.family_size
    }

    pub fn has_family(&self) -> bool {
        self.family_size > 1
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn completion_time(&self) -> Option<f64> {
        self.completion_time
    }

    pub fn cumulative_wait(&self) -> f64 {
        self.cumulative_wait
    }

    /// Children and injured survivors go through the medical station.
    pub fn requires_medical(&self) -> bool {
        self.age_category == AgeCategory::Child || self.health == HealthCondition::Injured
    }

    pub fn requests_optional_service(&self) -> bool {
        self.requests_optional_service
    }

    pub fn assigned_outcome(&self) -> Option<&str> {
        self.assigned_outcome.as_deref()
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Time spent in the camp: until settlement, or until `now` while in flight.
    pub fn time_in_camp(&self, now: f64) -> f64 {
        self.completion_time.unwrap_or(now) - self.arrival_time
    }

    /// Adds to the wait total. Negative or NaN amounts are ignored.
    pub fn record_wait(&mut self, wait: f64) {
        if wait > 0.0 {
            self.cumulative_wait += wait;
        }
    }

    /// Sets the outcome bucket. Returns `false` (and changes nothing) if one is already set.
    pub fn assign_outcome(&mut self, outcome: impl Into<String>) -> bool {
        if self.assigned_outcome.is_some() {
            return false;
        }
        self.assigned_outcome = Some(outcome.into());
        true
    }

    /// Stamps the completion time and marks the survivor processed.
    ///
    /// Returns `false` if the survivor was already settled.
    pub fn settle(&mut self, time: f64) -> bool {
        if self.processed {
            return false;
        }
        self.completion_time = Some(time);
        self.processed = true;
        true
    }
}

/// Arena of every survivor that has arrived, indexed by id.
#[derive(Debug, Default)]
pub struct Roster {
    survivors: Vec<Survivor>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next pushed survivor must carry.
    pub fn next_id(&self) -> SurvivorId {
        SurvivorId(self.survivors.len() as u64 + 1)
    }

    /// Adds a survivor and returns its id.
    pub fn push(&mut self, survivor: Survivor) -> SurvivorId {
        debug_assert_eq!(survivor.id(), self.next_id());
        let id = survivor.id();
        self.survivors.push(survivor);
        id
    }

    pub fn get(&self, id: SurvivorId) -> Option<&Survivor> {
        Self::slot(id).and_then(|i| self.survivors.get(i))
    }

    pub fn get_mut(&mut self, id: SurvivorId) -> Option<&mut Survivor> {
        Self::slot(id).and_then(|i| self.survivors.get_mut(i))
    }

    /// Like [`get`](Self::get) but unknown ids are an error.
    pub fn lookup(&self, id: SurvivorId) -> Result<&Survivor, CampError> {
        self.get(id).ok_or(CampError::UnknownSurvivor(id.0))
    }

    /// Like [`get_mut`](Self::get_mut) but unknown ids are an error.
    pub fn lookup_mut(&mut self, id: SurvivorId) -> Result<&mut Survivor, CampError> {
        self.get_mut(id).ok_or(CampError::UnknownSurvivor(id.0))
    }

    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }

    pub fn as_slice(&self) -> &[Survivor] {
        &self.survivors
    }

    pub fn iter(&self) -> impl Iterator<Item = &Survivor> {
        self.survivors.iter()
    }

    fn slot(id: SurvivorId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }
}

/// Seeded sampler of survivor attributes.
#[derive(Debug, Clone)]
pub struct PopulationSampler {
    config: PopulationConfig,
    rng: ChaCha8Rng,
}

impl PopulationSampler {
    /// Creates a sampler after checking the population parameters.
    pub fn new(config: PopulationConfig, seed: u64) -> Result<Self, CampError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Draws the attributes of the next survivor.
    pub fn sample(&mut self) -> SurvivorProfile {
        let age = self.rng.gen_range(1..=self.config.max_age);
        let age_category = if age < self.config.child_age_limit {
            AgeCategory::Child
        } else {
            AgeCategory::Adult
        };
        let health = if self.rng.gen_bool(self.config.injury_probability) {
            HealthCondition::Injured
        } else {
            HealthCondition::Healthy
        };
        let family_size = if self.rng.gen_bool(self.config.family_probability) {
            self.rng.gen_range(2..=self.config.max_family_size)
        } else {
            1
        };
        let wants_optional_service = self.rng.gen_bool(self.config.optional_service_probability);

        SurvivorProfile {
            age,
            age_category,
            health,
            family_size,
            wants_optional_service,
        }
    }
}
