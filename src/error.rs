//! Error types for calculator operations.

use crate::models::Field;
use thiserror::Error;

/// Errors returned by the aggregator and the session reducer.
///
/// None of these are fatal: the state the action was applied to is left
/// untouched and the caller reports the message to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Please enter at least one valid score and credit value.")]
    NoEligibleRecords,

    #[error("Please calculate CGPA first.")]
    CgpaNotComputed,

    #[error("Semester {id}: '{value}' is not a valid {field} (expected a non-negative number)")]
    InvalidNumber { id: u32, field: Field, value: String },

    #[error("Semester {id} does not exist (valid semesters are 1-{count})")]
    UnknownSemester { id: u32, count: usize },

    #[error("Scores or credits are too large to combine into a result.")]
    OutOfRange,
}
