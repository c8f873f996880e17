//! Analysis modules.
//!
//! Eligibility filtering and the CGPA / percentage formulas.

pub mod aggregator;

pub use aggregator::*;
