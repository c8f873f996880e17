//! Calculator session state.
//!
//! The session holds a fixed number of semester records and the two
//! derived results. All changes go through [`reduce`], a pure transition
//! function: it either returns the next state or a [`CalcError`], in which
//! case the caller keeps the state it already had.

use crate::analysis::{self, CgpaBreakdown, PercentageFormula};
use crate::error::CalcError;
use crate::models::{Field, SemesterRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of semester slots in a new session.
pub const DEFAULT_SEMESTER_COUNT: usize = 8;

/// A user action against the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the text of one field of one semester.
    Edit { id: u32, field: Field, value: String },
    /// Aggregate eligible semesters into a CGPA.
    ComputeCgpa,
    /// Convert the current CGPA into a percentage.
    ComputePercentage,
    /// Blank every field and drop derived results.
    ClearAll,
}

/// Everything a renderer needs to display results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayView {
    pub cgpa: Option<f64>,
    pub percentage: Option<f64>,
    pub has_cgpa: bool,
    pub has_percentage: bool,
}

/// Records plus derived results for one calculator session.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorState {
    records: Vec<SemesterRecord>,
    cgpa: Option<CgpaBreakdown>,
    percentage: Option<f64>,
}

impl Default for AggregatorState {
    fn default() -> Self {
        Self::new(DEFAULT_SEMESTER_COUNT)
    }
}

impl AggregatorState {
    /// Create a session with `count` empty semesters numbered from 1.
    pub fn new(count: usize) -> Self {
        Self {
            records: (1..=count as u32).map(SemesterRecord::new).collect(),
            cgpa: None,
            percentage: None,
        }
    }

    pub fn records(&self) -> &[SemesterRecord] {
        &self.records
    }

    pub fn semester_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, id: u32) -> Option<&SemesterRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The last computed CGPA with its totals, if still current.
    pub fn cgpa_breakdown(&self) -> Option<&CgpaBreakdown> {
        self.cgpa.as_ref()
    }

    pub fn cgpa(&self) -> Option<f64> {
        self.cgpa.map(|b| b.cgpa)
    }

    pub fn percentage(&self) -> Option<f64> {
        self.percentage
    }

    pub fn has_cgpa(&self) -> bool {
        self.cgpa.is_some()
    }

    pub fn has_percentage(&self) -> bool {
        self.percentage.is_some()
    }

    pub fn view(&self) -> DisplayView {
        DisplayView {
            cgpa: self.cgpa(),
            percentage: self.percentage(),
            has_cgpa: self.has_cgpa(),
            has_percentage: self.has_percentage(),
        }
    }

    /// Apply `action` in place. On error the state is left unchanged.
    pub fn apply(&mut self, action: &Action, formula: &PercentageFormula) -> Result<(), CalcError> {
        *self = reduce(self, action, formula)?;
        Ok(())
    }

    fn reset_derived(&mut self) {
        self.cgpa = None;
        self.percentage = None;
    }

    fn clear_all(&mut self) {
        for record in &mut self.records {
            record.score.clear();
            record.credit.clear();
        }
        self.reset_derived();
    }
}

/// Compute the state that results from applying `action` to `state`.
pub fn reduce(
    state: &AggregatorState,
    action: &Action,
    formula: &PercentageFormula,
) -> Result<AggregatorState, CalcError> {
    match action {
        Action::Edit { id, field, value } => {
            let index = state
                .records
                .iter()
                .position(|r| r.id == *id)
                .ok_or(CalcError::UnknownSemester {
                    id: *id,
                    count: state.records.len(),
                })?;

            let accepted =
                analysis::accept_numeric_entry(value).ok_or_else(|| CalcError::InvalidNumber {
                    id: *id,
                    field: *field,
                    value: value.clone(),
                })?;

            let mut next = state.clone();
            *next.records[index].get_mut(*field) = accepted;
            next.reset_derived();
            Ok(next)
        }
        Action::ComputeCgpa => {
            let eligible = analysis::validate_and_filter(&state.records);
            let breakdown = analysis::compute_cgpa(&eligible)?;

            let mut next = state.clone();
            // A percentage only survives if it was derived from this same value.
            if next.cgpa() != Some(breakdown.cgpa) {
                next.percentage = None;
            }
            next.cgpa = Some(breakdown);
            Ok(next)
        }
        Action::ComputePercentage => {
            let cgpa = state.cgpa().ok_or(CalcError::CgpaNotComputed)?;
            let percentage = analysis::compute_percentage(cgpa, formula);
            if !percentage.is_finite() {
                return Err(CalcError::OutOfRange);
            }
            debug!("Percentage {:.2} from CGPA {:.3}", percentage, cgpa);

            let mut next = state.clone();
            next.percentage = Some(percentage);
            Ok(next)
        }
        Action::ClearAll => {
            let mut next = state.clone();
            next.clear_all();
            Ok(next)
        }
    }
}
