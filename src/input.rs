//! Semester entry loading.
//!
//! Entries come from `--semester SCORE:CREDIT` pairs or from a TOML/JSON
//! file, and are fed into the session as ordinary edits so they pass the
//! same validation as typed input.

use crate::analysis::{accept_numeric_entry, PercentageFormula};
use crate::models::Field;
use crate::session::{Action, AggregatorState};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// One semester's worth of input.
///
/// `None` fields are left untouched when the entry is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterEntry {
    /// Target semester; entries without one are numbered by position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default, deserialize_with = "numeric_text")]
    pub score: Option<String>,
    #[serde(default, deserialize_with = "numeric_text")]
    pub credit: Option<String>,
}

impl SemesterEntry {
    /// Build a positional entry; empty strings mean "not given".
    pub fn new(score: &str, credit: &str) -> Self {
        let given = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            id: None,
            score: given(score),
            credit: given(credit),
        }
    }
}

/// File values may be written as strings or as bare numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericText {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn numeric_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumericText>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        NumericText::Text(s) => s,
        NumericText::Integer(i) => i.to_string(),
        NumericText::Float(f) => f.to_string(),
    }))
}

/// Layout of an input file: a list under the `semester` key.
#[derive(Debug, Deserialize)]
struct InputFile {
    #[serde(default, rename = "semester")]
    semesters: Vec<SemesterEntry>,
}

/// JSON inputs may also be a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Wrapped(InputFile),
    List(Vec<SemesterEntry>),
}

/// Parse a `SCORE:CREDIT` pair from the command line.
pub fn parse_pair(s: &str) -> Result<SemesterEntry, String> {
    let (score, credit) = s
        .split_once(':')
        .ok_or_else(|| format!("expected SCORE:CREDIT, got '{}'", s))?;

    for (name, value) in [("score", score), ("credit", credit)] {
        if accept_numeric_entry(value).is_none() {
            return Err(format!("'{}' is not a valid {}", value.trim(), name));
        }
    }

    Ok(SemesterEntry::new(score.trim(), credit.trim()))
}

/// Load semester entries from a `.toml` or `.json` file.
pub fn load_entries(path: &Path) -> Result<Vec<SemesterEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let entries = match extension.as_str() {
        "toml" => {
            let file: InputFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse input file: {}", path.display()))?;
            file.semesters
        }
        "json" => {
            let input: JsonInput = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse input file: {}", path.display()))?;
            match input {
                JsonInput::Wrapped(file) => file.semesters,
                JsonInput::List(entries) => entries,
            }
        }
        other => bail!(
            "Unsupported input format '{}' for {} (expected .toml or .json)",
            other,
            path.display()
        ),
    };

    info!("Loaded {} semester entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Apply entries to the session as field edits.
///
/// Entries without an explicit id are numbered by their position, starting
/// at `first_id`. Returns the semester after the highest one touched, so a
/// later batch can continue the numbering.
pub fn apply_entries(
    state: &mut AggregatorState,
    entries: &[SemesterEntry],
    first_id: u32,
    formula: &PercentageFormula,
) -> Result<u32> {
    let mut next_id = first_id;

    for (index, entry) in entries.iter().enumerate() {
        let id = entry.id.unwrap_or(first_id + index as u32);
        next_id = next_id.max(id.saturating_add(1));

        for (field, value) in [(Field::Score, &entry.score), (Field::Credit, &entry.credit)] {
            let Some(value) = value else {
                continue;
            };

            let action = Action::Edit {
                id,
                field,
                value: value.clone(),
            };
            state
                .apply(&action, formula)
                .with_context(|| format!("Invalid entry #{} (semester {})", index + 1, id))?;
        }

        debug!("Applied entry for semester {}", id);
    }

    Ok(next_id)
}
