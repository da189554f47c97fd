//! Pipeline wiring between stations.
//!
//! Every source (the arrival stream or a station) owns an ordered list of
//! branches. The first branch whose predicate holds decides where the
//! survivor goes next.

use crate::error::CampError;
use crate::station::StationKind;
use crate::survivor::{AgeCategory, Survivor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Condition on survivor attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Always,
    RequiresMedical,
    RequestsOptionalService,
    IsChild,
    IsAdult,
}

impl Predicate {
    pub fn matches(self, survivor: &Survivor) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::RequiresMedical => survivor.requires_medical(),
            Predicate::RequestsOptionalService => {
                survivor.age_category() == AgeCategory::Adult
                    && survivor.requests_optional_service()
            }
            Predicate::IsChild => survivor.age_category() == AgeCategory::Child,
            Predicate::IsAdult => survivor.age_category() == AgeCategory::Adult,
        }
    }
}

/// Where a branch sends the survivor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Station(StationKind),
    /// Leave the pipeline
    Settle,
}

/// Point a survivor is routed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Arrival,
    Station(StationKind),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Arrival => write!(f, "arrival"),
            Source::Station(kind) => write!(f, "{}", kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub when: Predicate,
    pub to: Target,
}

/// Directed pipeline of stations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    arrival: Vec<Branch>,
    stations: BTreeMap<StationKind, Vec<Branch>>,
}

impl Pipeline {
    /// Empty pipeline; add branches with [`branch`](Self::branch).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a branch to `source`. Branches are tried in insertion order.
    pub fn branch(mut self, source: Source, when: Predicate, to: Target) -> Self {
        let branch = Branch { when, to };
        match source {
            Source::Arrival => self.arrival.push(branch),
            Source::Station(kind) => self.stations.entry(kind).or_default().push(branch),
        }
        self
    }

    /// Branches leaving `source`.
    pub fn branches(&self, source: Source) -> &[Branch] {
        match source {
            Source::Arrival => &self.arrival,
            Source::Station(kind) => self.stations.get(&kind).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Stations any branch leads to.
    pub fn reachable(&self) -> impl Iterator<Item = StationKind> + '_ {
        self.arrival
            .iter()
            .chain(self.stations.values().flatten())
            .filter_map(|b| match b.to {
                Target::Station(kind) => Some(kind),
                Target::Settle => None,
            })
    }

    /// Next target for `survivor` leaving `source`; the first matching branch wins.
    ///
    /// # Errors
    /// `CampError::Unrouted` when no branch matches.
    pub fn route(&self, source: Source, survivor: &Survivor) -> Result<Target, CampError> {
        self.branches(source)
            .iter()
            .find(|b| b.when.matches(survivor))
            .map(|b| b.to)
            .ok_or_else(|| CampError::Unrouted {
                from: source.to_string(),
                survivor: survivor.id().0,
            })
    }

    /// Checks the pipeline can route every survivor.
    ///
    /// Each branch list must end in an `Always` fallback, arrivals must enter
    /// a station, and every station a branch leads to must have its own
    /// outgoing branches.
    pub fn validate(&self) -> Result<(), CampError> {
        Self::check_fallback(Source::Arrival, &self.arrival)?;
        if self.arrival.iter().any(|b| b.to == Target::Settle) {
            return Err(CampError::pipeline("arrivals must enter a station"));
        }
        for (&kind, branches) in &self.stations {
            Self::check_fallback(Source::Station(kind), branches)?;
        }
        for kind in self.reachable() {
            if !self.stations.contains_key(&kind) {
                return Err(CampError::pipeline(format!(
                    "{} is reachable but has no outgoing branches",
                    kind
                )));
            }
        }
        Ok(())
    }

    fn check_fallback(source: Source, branches: &[Branch]) -> Result<(), CampError> {
        match branches.last() {
            Some(b) if b.when == Predicate::Always => Ok(()),
            Some(_) => Err(CampError::pipeline(format!(
                "branches from {} do not end with an `always` fallback",
                source
            ))),
            None => Err(CampError::pipeline(format!("no branches from {}", source))),
        }
    }

    /// The rescue camp: medical triage, registration, optional communication,
    /// supplies, accommodation, then the child or adult shelter.
    pub fn rescue_camp() -> Self {
        use Predicate::*;
        use StationKind::*;

        Self::new()
            .branch(Source::Arrival, RequiresMedical, Target::Station(Medical))
            .branch(Source::Arrival, Always, Target::Station(Registration))
            .branch(Source::Station(Medical), Always, Target::Station(Registration))
            .branch(
                Source::Station(Registration),
                RequestsOptionalService,
                Target::Station(Communication),
            )
            .branch(Source::Station(Registration), Always, Target::Station(Supplies))
            .branch(Source::Station(Communication), Always, Target::Station(Supplies))
            .branch(Source::Station(Supplies), Always, Target::Station(Accommodation))
            .branch(Source::Station(Accommodation), IsChild, Target::Station(ChildShelter))
            .branch(Source::Station(Accommodation), Always, Target::Station(AdultShelter))
            .branch(Source::Station(ChildShelter), Always, Target::Settle)
            .branch(Source::Station(AdultShelter), Always, Target::Settle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survivor::{HealthCondition, SurvivorId, SurvivorProfile};

    fn survivor(age_category: AgeCategory, health: HealthCondition, optional: bool) -> Survivor {
        Survivor::new(
            SurvivorId(1),
            0.0,
            SurvivorProfile {
                age: if age_category == AgeCategory::Child { 8 } else { 40 },
                age_category,
                health,
                family_size: 1,
                wants_optional_service: optional,
            },
        )
    }

    fn path(pipeline: &Pipeline, s: &Survivor) -> Vec<StationKind> {
        let mut stations = Vec::new();
        let mut source = Source::Arrival;
        loop {
            match pipeline.route(source, s).unwrap() {
                Target::Station(kind) => {
                    stations.push(kind);
                    source = Source::Station(kind);
                }
                Target::Settle => return stations,
            }
        }
    }

    #[test]
    fn test_rescue_camp_is_valid() {
        Pipeline::rescue_camp().validate().unwrap();
    }

    #[test]
    fn test_healthy_adult_path() {
        let p = Pipeline::rescue_camp();
        let s = survivor(AgeCategory::Adult, HealthCondition::Healthy, false);
        assert_eq!(
            path(&p, &s),
            vec![
                StationKind::Registration,
                StationKind::Supplies,
                StationKind::Accommodation,
                StationKind::AdultShelter,
            ]
        );
    }

    #[test]
    fn test_injured_adult_with_optional_service() {
        let p = Pipeline::rescue_camp();
        let s = survivor(AgeCategory::Adult, HealthCondition::Injured, true);
        assert_eq!(
            path(&p, &s),
            vec![
                StationKind::Medical,
                StationKind::Registration,
                StationKind::Communication,
                StationKind::Supplies,
                StationKind::Accommodation,
                StationKind::AdultShelter,
            ]
        );
    }

    #[test]
    fn test_child_path() {
        let p = Pipeline::rescue_camp();
        // The coin flip is ignored for children
        let s = survivor(AgeCategory::Child, HealthCondition::Healthy, true);
        assert_eq!(
            path(&p, &s),
            vec![
                StationKind::Medical,
                StationKind::Registration,
                StationKind::Supplies,
                StationKind::Accommodation,
                StationKind::ChildShelter,
            ]
        );
    }

    #[test]
    fn test_unrouted() {
        let p = Pipeline::new().branch(
            Source::Arrival,
            Predicate::IsChild,
            Target::Station(StationKind::ChildShelter),
        );
        let s = survivor(AgeCategory::Adult, HealthCondition::Healthy, false);
        assert!(matches!(
            p.route(Source::Arrival, &s),
            Err(CampError::Unrouted { survivor: 1, .. })
        ));
        assert!(matches!(
            p.route(Source::Station(StationKind::Medical), &s),
            Err(CampError::Unrouted { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_fallback() {
        let p = Pipeline::new()
            .branch(Source::Arrival, Predicate::IsChild, Target::Station(StationKind::ChildShelter))
            .branch(Source::Station(StationKind::ChildShelter), Predicate::Always, Target::Settle);
        assert!(matches!(p.validate(), Err(CampError::InvalidPipeline(_))));
    }

    #[test]
    fn test_validate_rejects_dangling_station() {
        let p = Pipeline::new().branch(
            Source::Arrival,
            Predicate::Always,
            Target::Station(StationKind::Supplies),
        );
        assert!(matches!(p.validate(), Err(CampError::InvalidPipeline(_))));
    }

    #[test]
    fn test_validate_rejects_settle_on_arrival() {
        let p = Pipeline::new().branch(Source::Arrival, Predicate::Always, Target::Settle);
        assert!(p.validate().is_err());
        assert!(Pipeline::new().validate().is_err());
    }
}
