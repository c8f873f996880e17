//! Semester aggregation and derived results.
//!
//! This module turns a list of semester records into a CGPA and converts
//! a CGPA into an equivalent percentage. Everything here is pure; the
//! session module decides when these run and what happens to the result.

use crate::error::CalcError;
use crate::models::SemesterRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Decimal digits kept for a computed CGPA.
pub const CGPA_PRECISION: u32 = 3;

/// Decimal digits kept for a computed percentage.
pub const PERCENTAGE_PRECISION: u32 = 2;

/// Two-branch linear CGPA to percentage conversion.
///
/// Below `boundary` the lower slope applies; at or above it the upper
/// slope applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageFormula {
    pub boundary: f64,
    pub lower_slope: f64,
    pub upper_slope: f64,
    pub intercept: f64,
}

impl Default for PercentageFormula {
    fn default() -> Self {
        Self {
            boundary: 7.0,
            lower_slope: 7.1,
            upper_slope: 7.4,
            intercept: 12.0,
        }
    }
}

impl From<&crate::config::FormulaConfig> for PercentageFormula {
    fn from(config: &crate::config::FormulaConfig) -> Self {
        Self {
            boundary: config.boundary,
            lower_slope: config.lower_slope,
            upper_slope: config.upper_slope,
            intercept: config.intercept,
        }
    }
}

/// Result of a CGPA computation with the totals it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CgpaBreakdown {
    /// CGPA rounded to [`CGPA_PRECISION`] digits.
    pub cgpa: f64,
    /// Sum of scores over eligible records.
    pub total_score: f64,
    /// Sum of credits over eligible records.
    pub total_credits: f64,
    /// Number of records that contributed.
    pub eligible_count: usize,
}

/// Parse stored field text as a non-negative finite number.
///
/// Returns `None` for empty text and for anything that is not a number.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}

/// Decide whether raw text typed into a field may be stored.
///
/// Returns the text to store (trimmed) or `None` if the entry must be
/// rejected. Blank input is accepted and clears the field.
pub fn accept_numeric_entry(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(String::new());
    }

    parse_number(trimmed).map(|_| trimmed.to_string())
}

/// Returns the parsed (score, credit) pair if the record may be aggregated.
fn eligible_values(record: &SemesterRecord) -> Option<(f64, f64)> {
    let score = parse_number(&record.score)?;
    let credit = parse_number(&record.credit)?;

    if credit > 0.0 {
        Some((score, credit))
    } else {
        None
    }
}

/// Keep only records with both fields numeric and a positive credit.
///
/// Order is preserved. Ineligible records are dropped without error.
pub fn validate_and_filter(records: &[SemesterRecord]) -> Vec<&SemesterRecord> {
    records
        .iter()
        .filter(|record| {
            let eligible = eligible_values(record).is_some();
            if !eligible && !record.is_blank() {
                debug!(
                    "Skipping semester {} (score '{}', credit '{}')",
                    record.id, record.score, record.credit
                );
            }
            eligible
        })
        .collect()
}

/// Compute the CGPA as total score over total credits.
///
/// Scores are already credit-weighted, so this is a plain sum ratio.
pub fn compute_cgpa(eligible: &[&SemesterRecord]) -> Result<CgpaBreakdown, CalcError> {
    let mut total_score = 0.0;
    let mut total_credits = 0.0;
    let mut eligible_count = 0;

    for (score, credit) in eligible.iter().filter_map(|r| eligible_values(r)) {
        total_score += score;
        total_credits += credit;
        eligible_count += 1;
    }

    if eligible_count == 0 {
        return Err(CalcError::NoEligibleRecords);
    }

    let ratio = total_score / total_credits;
    if !total_score.is_finite() || !total_credits.is_finite() || !ratio.is_finite() {
        return Err(CalcError::OutOfRange);
    }

    let cgpa = round_to(ratio, CGPA_PRECISION);
    debug!(
        "CGPA {:.3} from {} semesters ({} / {})",
        cgpa, eligible_count, total_score, total_credits
    );

    Ok(CgpaBreakdown {
        cgpa,
        total_score,
        total_credits,
        eligible_count,
    })
}

/// Convert a CGPA into an equivalent percentage.
pub fn compute_percentage(cgpa: f64, formula: &PercentageFormula) -> f64 {
    let slope = if cgpa < formula.boundary {
        formula.lower_slope
    } else {
        formula.upper_slope
    };

    round_to(slope * cgpa + formula.intercept, PERCENTAGE_PRECISION)
}

/// Round to `digits` decimal places, ties away from zero.
///
/// Rounds the exact decimal value of the `f64`, so a value stored just
/// below a midpoint (1.005 is really 1.00499999...) rounds down.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };

    exact
        .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
        .parse()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, score: &str, credit: &str) -> SemesterRecord {
        SemesterRecord {
            id,
            score: score.to_string(),
            credit: credit.to_string(),
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("210"), Some(210.0));
        assert_eq!(parse_number(" 18.5 "), Some(18.5));
        assert_eq!(parse_number("0"), Some(0.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("-3"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_accept_numeric_entry() {
        assert_eq!(accept_numeric_entry("210"), Some("210".to_string()));
        assert_eq!(accept_numeric_entry(" 7.5 "), Some("7.5".to_string()));
        assert_eq!(accept_numeric_entry(""), Some(String::new()));
        assert_eq!(accept_numeric_entry("   "), Some(String::new()));
        assert_eq!(accept_numeric_entry("21a"), None);
        assert_eq!(accept_numeric_entry("-1"), None);
    }

    #[test]
    fn test_validate_and_filter_preserves_order() {
        let records = vec![
            record(1, "210", "18"),
            record(2, "", "20"),
            record(3, "150", "0"),
            record(4, "abc", "10"),
            record(5, "180", "20"),
            record(6, "", ""),
        ];

        let eligible = validate_and_filter(&records);
        let ids: Vec<u32> = eligible.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_compute_cgpa_sum_ratio() {
        let records = vec![record(1, "210", "18"), record(2, "180", "20")];
        let eligible = validate_and_filter(&records);

        let breakdown = compute_cgpa(&eligible).unwrap();
        assert_eq!(breakdown.cgpa, 10.263);
        assert_eq!(breakdown.total_score, 390.0);
        assert_eq!(breakdown.total_credits, 38.0);
        assert_eq!(breakdown.eligible_count, 2);
    }

    #[test]
    fn test_compute_cgpa_rounds_to_three_digits() {
        let records = vec![record(1, "100", "3")];
        let eligible = validate_and_filter(&records);

        let breakdown = compute_cgpa(&eligible).unwrap();
        assert!((breakdown.cgpa - 33.333).abs() < 1e-9);
    }

    #[test]
    fn test_compute_cgpa_empty() {
        let records = vec![record(1, "", ""), record(2, "100", "0")];
        let eligible = validate_and_filter(&records);

        assert!(eligible.is_empty());
        assert_eq!(compute_cgpa(&eligible), Err(CalcError::NoEligibleRecords));
    }

    #[test]
    fn test_percentage_branches() {
        let formula = PercentageFormula::default();

        assert!((compute_percentage(6.99, &formula) - 61.63).abs() < 1e-9);
        assert!((compute_percentage(7.0, &formula) - 63.8).abs() < 1e-9);
        assert!((compute_percentage(8.5, &formula) - 74.9).abs() < 1e-9);
        assert!((compute_percentage(0.0, &formula) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_formula() {
        let formula = PercentageFormula {
            boundary: 5.0,
            lower_slope: 10.0,
            upper_slope: 9.5,
            intercept: 0.0,
        };

        assert!((compute_percentage(4.0, &formula) - 40.0).abs() < 1e-9);
        assert!((compute_percentage(6.0, &formula) - 57.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(10.263157, 3), 10.263);
        assert_eq!(round_to(61.629, 2), 61.63);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(0.125, 2), 0.13);
    }

    #[test]
    fn test_round_to_uses_stored_value() {
        // Each of these sits just below the midpoint once stored as f64.
        assert_eq!(round_to(7.1 * 6.95 + 12.0, 2), 61.34);
        assert_eq!(round_to(1.005, 2), 1.0);
    }

    #[test]
    fn test_compute_cgpa_rejects_overflowing_totals() {
        let records = vec![record(1, "1e308", "1"), record(2, "1e308", "1")];
        let eligible = validate_and_filter(&records);

        assert_eq!(eligible.len(), 2);
        assert_eq!(compute_cgpa(&eligible), Err(CalcError::OutOfRange));
    }

    #[test]
    fn test_compute_cgpa_rejects_overflowing_ratio() {
        let records = vec![record(1, "1e300", "1e-300")];
        let eligible = validate_and_filter(&records);

        assert_eq!(compute_cgpa(&eligible), Err(CalcError::OutOfRange));
    }
}
