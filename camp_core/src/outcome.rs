//! Weighted outcome tables used at the shelters.

use crate::error::CampError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A named outcome bucket and its probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeWeight {
    pub name: String,
    pub weight: f64,
}

impl OutcomeWeight {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Categorical distribution over outcome names.
#[derive(Debug, Clone)]
pub struct OutcomeTable {
    names: Vec<String>,
    index: WeightedIndex<f64>,
}

impl OutcomeTable {
    /// Builds a table. Weights must be finite, non-negative and sum to 1.
    pub fn new(weights: &[OutcomeWeight]) -> Result<Self, CampError> {
        if weights.is_empty() {
            return Err(CampError::InvalidOutcomeWeights("empty table".into()));
        }
        if let Some(bad) = weights
            .iter()
            .find(|w| !w.weight.is_finite() || w.weight < 0.0)
        {
            return Err(CampError::InvalidOutcomeWeights(format!(
                "weight for '{}' must be finite and >= 0 (got {})",
                bad.name, bad.weight
            )));
        }
        let sum: f64 = weights.iter().map(|w| w.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CampError::InvalidOutcomeWeights(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }
        let index = WeightedIndex::new(weights.iter().map(|w| w.weight))
            .map_err(|e| CampError::InvalidOutcomeWeights(e.to_string()))?;

        Ok(Self {
            names: weights.iter().map(|w| w.name.clone()).collect(),
            index,
        })
    }

    /// Draws one outcome name.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.names[self.index.sample(rng)]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Default buckets for the child shelter.
pub fn child_shelter_outcomes() -> Vec<OutcomeWeight> {
    vec![
        OutcomeWeight::new("Children's Dormitory", 0.6),
        OutcomeWeight::new("Family Reunion Tent", 0.4),
    ]
}

/// Default buckets for the adult shelter.
pub fn adult_shelter_outcomes() -> Vec<OutcomeWeight> {
    vec![
        OutcomeWeight::new("Tent Block A", 0.4),
        OutcomeWeight::new("Tent Block B", 0.35),
        OutcomeWeight::new("Community Hall", 0.25),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(OutcomeTable::new(&child_shelter_outcomes()).unwrap().names().len(), 2);
        assert_eq!(OutcomeTable::new(&adult_shelter_outcomes()).unwrap().names().len(), 3);
    }

    #[test]
    fn test_rejects_bad_sum() {
        let weights = vec![OutcomeWeight::new("a", 0.5), OutcomeWeight::new("b", 0.4)];
        assert!(matches!(
            OutcomeTable::new(&weights),
            Err(CampError::InvalidOutcomeWeights(_))
        ));
    }

    #[test]
    fn test_rejects_negative_and_empty() {
        let weights = vec![OutcomeWeight::new("a", 1.5), OutcomeWeight::new("b", -0.5)];
        assert!(OutcomeTable::new(&weights).is_err());
        assert!(OutcomeTable::new(&[]).is_err());
    }

    #[test]
    fn test_zero_weight_never_picked() {
        let weights = vec![OutcomeWeight::new("never", 0.0), OutcomeWeight::new("always", 1.0)];
        let table = OutcomeTable::new(&weights).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..200 {
            assert_eq!(table.pick(&mut rng), "always");
        }
    }

    #[test]
    fn test_pick_frequencies() {
        let table = OutcomeTable::new(&adult_shelter_outcomes()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 10_000;
        let hall = (0..n).filter(|_| table.pick(&mut rng) == "Community Hall").count();
        let share = hall as f64 / n as f64;
        assert!((share - 0.25).abs() < 0.03, "share = {}", share);
    }
}
