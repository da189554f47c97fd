//! CSV and JSON export of a finished run.
//!
//! Errors are returned to the caller; the CLI logs them and carries on.

use camp_core::{CampResults, Survivor};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column header of the survivor CSV.
pub const CSV_HEADER: &str = "ID,Age,AgeCategory,HealthCondition,FamilySize,RequiresMedicalTreatment,RequestsCommunicationService,ArrivalTime,CompletionTime,TotalWaitingTime,AssignedHome";

/// Writes one row per survivor to `out`. Unset values are left empty.
pub fn write_survivors<'a, W: Write>(
    out: &mut W,
    survivors: impl IntoIterator<Item = &'a Survivor>,
) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for s in survivors {
        let completion = s
            .completion_time()
            .map(|t| format!("{:.2}", t))
            .unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{},{},{},{:.2},{},{:.2},{}",
            s.id().0,
            s.age(),
            s.age_category(),
            s.health(),
            s.family_size(),
            s.requires_medical(),
            s.requests_optional_service(),
            s.arrival_time(),
            completion,
            s.cumulative_wait(),
            csv_field(s.assigned_outcome().unwrap_or("")),
        )?;
    }
    Ok(())
}

/// Writes the survivor CSV to `path`.
pub fn write_survivors_csv<'a>(
    path: impl AsRef<Path>,
    survivors: impl IntoIterator<Item = &'a Survivor>,
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_survivors(&mut out, survivors)?;
    out.flush()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One survivor in the JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivorRecord {
    pub id: u64,
    pub age: u32,
    pub age_category: String,
    pub health: String,
    pub family_size: u32,
    pub arrival_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<f64>,
    pub total_wait: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_home: Option<String>,
}

impl From<&Survivor> for SurvivorRecord {
    fn from(s: &Survivor) -> Self {
        Self {
            id: s.id().0,
            age: s.age(),
            age_category: s.age_category().to_string(),
            health: s.health().to_string(),
            family_size: s.family_size(),
            arrival_time: s.arrival_time(),
            completion_time: s.completion_time(),
            total_wait: s.cumulative_wait(),
            assigned_home: s.assigned_outcome().map(str::to_string),
        }
    }
}

/// Complete run export.
#[derive(Debug, Clone, Serialize)]
pub struct CampExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Aggregated results
    pub results: CampResults,

    /// Every survivor that arrived
    pub survivors: Vec<SurvivorRecord>,
}

impl CampExport {
    /// Creates a new export container.
    pub fn new<'a>(
        scenario: &str,
        seed: u64,
        results: CampResults,
        survivors: impl IntoIterator<Item = &'a Survivor>,
    ) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            results,
            survivors: survivors.into_iter().map(SurvivorRecord::from).collect(),
        }
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
