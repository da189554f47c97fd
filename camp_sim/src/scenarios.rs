//! Staffing and load scenarios for the camp.

use camp_core::{CampConfig, StationKind};
use camp_env::VariateSpec;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Reference staffing and arrival rate
    Baseline,

    /// One worker at every station
    Understaffed,

    /// Arrivals four times as frequent
    Surge,

    /// Five workers at every station under surge load
    FullStaff,

    /// Constant arrivals faster than a single worker can serve
    Saturation,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Baseline,
            ScenarioId::Understaffed,
            ScenarioId::Surge,
            ScenarioId::FullStaff,
            ScenarioId::Saturation,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::Understaffed => "understaffed",
            ScenarioId::Surge => "surge",
            ScenarioId::FullStaff => "full_staff",
            ScenarioId::Saturation => "saturation",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "Reference camp: arrivals every 20 min on average, default staffing",
            ScenarioId::Understaffed => "Every station down to a single worker",
            ScenarioId::Surge => "Arrivals every 5 min on average, default staffing",
            ScenarioId::FullStaff => "Arrivals every 5 min on average, five workers per station",
            ScenarioId::Saturation => "An arrival every 3 min, one worker per station",
        }
    }

    /// Whether queues are expected to keep growing until the horizon.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, ScenarioId::Saturation)
    }

    /// Rewrites `config` for this scenario. Horizon and seed are left alone.
    pub fn apply(&self, config: &mut CampConfig) {
        match self {
            ScenarioId::Baseline => {}
            ScenarioId::Understaffed => staff_all(config, 1),
            ScenarioId::Surge => config.set_arrival_mean(5.0),
            ScenarioId::FullStaff => {
                config.set_arrival_mean(5.0);
                staff_all(config, 5);
            }
            ScenarioId::Saturation => {
                config.arrival = VariateSpec::Constant { value: 3.0 };
                staff_all(config, 1);
            }
        }
    }

    /// Default config with this scenario applied.
    pub fn config(&self) -> CampConfig {
        let mut config = CampConfig::default();
        self.apply(&mut config);
        config
    }
}

fn staff_all(config: &mut CampConfig, workers: i64) {
    for kind in StationKind::ALL {
        config.set_workers(kind, workers);
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "baseline" | "default" => Ok(ScenarioId::Baseline),
            "understaffed" => Ok(ScenarioId::Understaffed),
            "surge" => Ok(ScenarioId::Surge),
            "full_staff" | "fullstaff" => Ok(ScenarioId::FullStaff),
            "saturation" => Ok(ScenarioId::Saturation),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
