//! Camp configuration.
//!
//! Every field has a default matching the reference camp, so a config file
//! only needs the values it overrides.

use crate::error::CampError;
use crate::outcome::{adult_shelter_outcomes, child_shelter_outcomes, OutcomeWeight};
use crate::station::{DurationPolicy, StationKind};
use camp_env::VariateSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the survivor population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Ages are drawn uniformly from `1..=max_age`
    pub max_age: u32,
    /// Survivors younger than this are children
    pub child_age_limit: u32,
    pub injury_probability: f64,
    pub family_probability: f64,
    pub max_family_size: u32,
    /// Chance an adult asks for the communication service
    pub optional_service_probability: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_age: 80,
            child_age_limit: 18,
            injury_probability: 0.2,
            family_probability: 0.7,
            max_family_size: 6,
            optional_service_probability: 0.4,
        }
    }
}

impl PopulationConfig {
    pub fn validate(&self) -> Result<(), CampError> {
        if self.max_age < 1 {
            return Err(CampError::population("max_age must be >= 1"));
        }
        if self.max_family_size < 2 {
            return Err(CampError::population("max_family_size must be >= 2"));
        }
        for (name, p) in [
            ("injury_probability", self.injury_probability),
            ("family_probability", self.family_probability),
            ("optional_service_probability", self.optional_service_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CampError::population(format!(
                    "{name} must be within [0, 1] (got {p})"
                )));
            }
        }
        Ok(())
    }
}

/// One station's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    pub name: String,
    /// Base service-duration distribution
    pub service: VariateSpec,
    /// Values below 1 are clamped to 1
    pub workers: i64,
    #[serde(default)]
    pub duration: DurationPolicy,
    /// Outcome buckets; only used by terminal stations
    #[serde(default)]
    pub outcomes: Vec<OutcomeWeight>,
}

impl StationConfig {
    fn new(kind: StationKind, service: VariateSpec, workers: i64) -> Self {
        Self {
            name: kind.default_name().to_string(),
            service,
            workers,
            duration: DurationPolicy::Sampled,
            outcomes: Vec::new(),
        }
    }

    fn with_duration(mut self, duration: DurationPolicy) -> Self {
        self.duration = duration;
        self
    }

    fn with_outcomes(mut self, outcomes: Vec<OutcomeWeight>) -> Self {
        self.outcomes = outcomes;
        self
    }
}

/// Parameters for every station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationsConfig {
    pub medical: StationConfig,
    pub registration: StationConfig,
    pub communication: StationConfig,
    pub supplies: StationConfig,
    pub accommodation: StationConfig,
    pub child_shelter: StationConfig,
    pub adult_shelter: StationConfig,
}

impl Default for StationsConfig {
    fn default() -> Self {
        use StationKind::*;
        let uniform = |min, max| VariateSpec::Uniform { min, max };
        let normal = |mean, sd| VariateSpec::Normal { mean, sd };

        Self {
            medical: StationConfig::new(Medical, uniform(10.0, 15.0), 5),
            registration: StationConfig::new(Registration, uniform(3.0, 5.0), 2),
            communication: StationConfig::new(Communication, uniform(3.0, 6.0), 2),
            supplies: StationConfig::new(Supplies, uniform(4.0, 7.0), 2)
                .with_duration(DurationPolicy::PerFamilyMember { minutes: 1.0 }),
            accommodation: StationConfig::new(Accommodation, normal(6.0, 1.0), 2),
            child_shelter: StationConfig::new(ChildShelter, normal(5.0, 1.0), 2)
                .with_duration(DurationPolicy::Fixed { minutes: 5.0 })
                .with_outcomes(child_shelter_outcomes()),
            adult_shelter: StationConfig::new(AdultShelter, normal(5.0, 1.0), 2)
                .with_duration(DurationPolicy::Fixed { minutes: 5.0 })
                .with_outcomes(adult_shelter_outcomes()),
        }
    }
}

impl StationsConfig {
    pub fn get(&self, kind: StationKind) -> &StationConfig {
        match kind {
            StationKind::Medical => &self.medical,
            StationKind::Registration => &self.registration,
            StationKind::Communication => &self.communication,
            StationKind::Supplies => &self.supplies,
            StationKind::Accommodation => &self.accommodation,
            StationKind::ChildShelter => &self.child_shelter,
            StationKind::AdultShelter => &self.adult_shelter,
        }
    }

    pub fn get_mut(&mut self, kind: StationKind) -> &mut StationConfig {
        match kind {
            StationKind::Medical => &mut self.medical,
            StationKind::Registration => &mut self.registration,
            StationKind::Communication => &mut self.communication,
            StationKind::Supplies => &mut self.supplies,
            StationKind::Accommodation => &mut self.accommodation,
            StationKind::ChildShelter => &mut self.child_shelter,
            StationKind::AdultShelter => &mut self.adult_shelter,
        }
    }
}

/// Full configuration of one camp run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampConfig {
    /// Simulated minutes to run; must be > 0
    pub horizon: f64,
    /// Master seed; every generator derives its own stream from it
    pub seed: u64,
    /// Inter-arrival gap distribution
    pub arrival: VariateSpec,
    pub population: PopulationConfig,
    pub stations: StationsConfig,
}

impl Default for CampConfig {
    fn default() -> Self {
        Self {
            horizon: 480.0,
            seed: 42,
            arrival: VariateSpec::NegExp { mean: 20.0 },
            population: PopulationConfig::default(),
            stations: StationsConfig::default(),
        }
    }
}

impl CampConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, CampError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CampError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Rejects a non-positive or non-finite horizon, an arrival process that
    /// can emit non-positive gaps, and bad population parameters.
    ///
    /// Service distribution parameters are checked when generators are built,
    /// and worker counts are clamped rather than rejected.
    pub fn validate(&self) -> Result<(), CampError> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(CampError::InvalidHorizon(self.horizon));
        }
        validate_arrival(&self.arrival)?;
        self.population.validate()
    }

    pub fn station(&self, kind: StationKind) -> &StationConfig {
        self.stations.get(kind)
    }

    /// Sets a station's worker count. Clamping happens when the station is built.
    pub fn set_workers(&mut self, kind: StationKind, workers: i64) {
        self.stations.get_mut(kind).workers = workers;
    }

    /// Replaces the arrival process with a negative exponential of the given mean.
    pub fn set_arrival_mean(&mut self, mean: f64) {
        self.arrival = VariateSpec::NegExp { mean };
    }
}

/// Every gap the arrival process can draw must be strictly positive,
/// otherwise arrivals pile up at one instant and the clock never reaches
/// the horizon.
fn validate_arrival(spec: &VariateSpec) -> Result<(), CampError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    match *spec {
        VariateSpec::Constant { value } if !positive(value) => Err(CampError::InvalidArrival(
            format!("constant gap must be > 0, got {value}"),
        )),
        VariateSpec::Uniform { min, max } if !positive(min) || !positive(max) => {
            Err(CampError::InvalidArrival(format!(
                "uniform gap bounds must be > 0, got [{min}, {max}]"
            )))
        }
        VariateSpec::NegExp { mean } if !positive(mean) => Err(CampError::InvalidArrival(
            format!("exponential mean must be > 0, got {mean}"),
        )),
        VariateSpec::Normal { mean, sd } => Err(CampError::InvalidArrival(format!(
            "normal gaps (mean {mean}, sd {sd}) can be zero or negative"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = CampConfig::default();
        config.validate().unwrap();
        assert_eq!(config.horizon, 480.0);
        assert_eq!(config.station(StationKind::Medical).workers, 5);
        assert_eq!(
            config.station(StationKind::ChildShelter).duration,
            DurationPolicy::Fixed { minutes: 5.0 }
        );
    }

    #[test]
    fn test_rejects_non_positive_horizon() {
        for horizon in [0.0, -10.0, f64::INFINITY, f64::NAN] {
            let config = CampConfig {
                horizon,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(CampError::InvalidHorizon(_))));
        }
    }

    #[test]
    fn test_rejects_non_positive_arrival_gap() {
        let bad = [
            VariateSpec::Constant { value: 0.0 },
            VariateSpec::Constant { value: -2.0 },
            VariateSpec::Constant { value: f64::NAN },
            VariateSpec::Uniform { min: 0.0, max: 0.0 },
            VariateSpec::Uniform { min: -1.0, max: 4.0 },
            VariateSpec::Normal { mean: 20.0, sd: 5.0 },
            VariateSpec::NegExp { mean: 0.0 },
        ];
        for arrival in bad {
            let config = CampConfig {
                arrival,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(CampError::InvalidArrival(_))),
                "{:?} accepted",
                config.arrival
            );
        }

        let config = CampConfig {
            arrival: VariateSpec::Uniform { min: 1.0, max: 4.0 },
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CampConfig::from_json_str(
            r#"{
                "horizon": 120.0,
                "arrival": { "kind": "constant", "value": 5.0 },
                "stations": {
                    "registration": {
                        "name": "Intake",
                        "service": { "kind": "uniform", "min": 1.0, "max": 2.0 },
                        "workers": 0
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.horizon, 120.0);
        assert_eq!(config.seed, 42);
        assert_eq!(config.arrival, VariateSpec::Constant { value: 5.0 });
        assert_eq!(config.station(StationKind::Registration).name, "Intake");
        assert_eq!(config.station(StationKind::Registration).workers, 0);
        assert_eq!(
            config.station(StationKind::Registration).duration,
            DurationPolicy::Sampled
        );
        assert_eq!(config.station(StationKind::Medical).workers, 5);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            CampConfig::from_json_str("{ horizon: }"),
            Err(CampError::Json(_))
        ));
        assert!(matches!(
            CampConfig::from_json_file("/nonexistent/camp.json"),
            Err(CampError::Io(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = CampConfig::default();
        config.set_workers(StationKind::Supplies, 4);
        config.set_arrival_mean(5.0);
        assert_eq!(config.station(StationKind::Supplies).workers, 4);
        assert_eq!(config.arrival, VariateSpec::NegExp { mean: 5.0 });
    }

    #[test]
    fn test_population_validation() {
        let bad = PopulationConfig {
            max_family_size: 1,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
