//! Result report generation.
//!
//! This module renders a calculator session as a terminal summary,
//! a Markdown document or JSON.

use crate::analysis::validate_and_filter;
use crate::models::{CgpaRemark, PercentageRemark, SemesterRecord};
use crate::session::{AggregatorState, DisplayView};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a session prepared for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// All semester slots, including blank ones.
    pub records: Vec<SemesterRecord>,
    /// Number of semesters that counted towards the CGPA.
    pub eligible_count: usize,
    /// Sum of eligible scores (present once a CGPA is computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    /// Sum of eligible credits (present once a CGPA is computed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_credits: Option<f64>,
    /// Derived results and their visibility.
    pub view: DisplayView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa_remark: Option<CgpaRemark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_remark: Option<PercentageRemark>,
}

impl SessionReport {
    /// Build a report from the current session state.
    pub fn from_state(state: &AggregatorState) -> Self {
        let breakdown = state.cgpa_breakdown();
        let view = state.view();

        Self {
            generated_at: Utc::now(),
            records: state.records().to_vec(),
            eligible_count: validate_and_filter(state.records()).len(),
            total_score: breakdown.map(|b| b.total_score),
            total_credits: breakdown.map(|b| b.total_credits),
            view,
            cgpa_remark: view.cgpa.map(CgpaRemark::for_cgpa),
            percentage_remark: view.percentage.map(PercentageRemark::for_percentage),
        }
    }
}

/// Generate a plain text summary.
pub fn generate_text_report(report: &SessionReport) -> String {
    let mut output = String::new();

    output.push_str(&generate_results_text(report));

    if let (Some(score), Some(credits)) = (report.total_score, report.total_credits) {
        output.push_str(&format!(
            "   From {} semester(s): {} / {} credits\n",
            report.eligible_count,
            format_number(score),
            format_number(credits)
        ));
    }

    output
}

/// Generate just the result lines (shared with the interactive session).
pub fn generate_results_text(report: &SessionReport) -> String {
    let mut section = String::new();

    if let (Some(cgpa), Some(remark)) = (report.view.cgpa, report.cgpa_remark) {
        section.push_str(&format!(
            "🎓 Your CGPA: {:.3}  {} {}\n",
            cgpa,
            remark.emoji(),
            remark
        ));
    }

    if let (Some(percentage), Some(remark)) = (report.view.percentage, report.percentage_remark)
    {
        section.push_str(&format!(
            "📊 Equivalent Percentage: {:.2}%  {} {}\n",
            percentage,
            remark.emoji(),
            remark
        ));
    }

    section
}

/// Generate a table of all semester slots.
pub fn generate_records_text(records: &[SemesterRecord]) -> String {
    let mut table = String::new();

    table.push_str("   Semester  C*G Score  Credits\n");
    for record in records {
        table.push_str(&format!(
            "   {:>8}  {:>9}  {:>7}\n",
            record.id,
            display_field(&record.score),
            display_field(&record.credit)
        ));
    }

    table
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &SessionReport) -> String {
    let mut output = String::new();

    output.push_str("# CGPA Report\n\n");
    output.push_str(&format!(
        "*Generated {}*\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str(&generate_semesters_section(&report.records));
    output.push_str(&generate_results_section(report));

    output
}

/// Generate the semester table.
fn generate_semesters_section(records: &[SemesterRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Semesters\n\n");
    section.push_str("| Semester | C*G Score | Credits |\n");
    section.push_str("|:---:|:---:|:---:|\n");

    for record in records.iter().filter(|r| !r.is_blank()) {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            record.id,
            display_field(&record.score),
            display_field(&record.credit)
        ));
    }
    section.push('\n');

    section
}

/// Generate the results section.
fn generate_results_section(report: &SessionReport) -> String {
    let mut section = String::new();

    section.push_str("## Results\n\n");

    match (report.view.cgpa, report.cgpa_remark) {
        (Some(cgpa), Some(remark)) => {
            section.push_str(&format!(
                "- **CGPA:** {:.3} ({} {})\n",
                cgpa,
                remark.emoji(),
                remark
            ));
        }
        _ => section.push_str("- **CGPA:** not calculated\n"),
    }

    if let (Some(percentage), Some(remark)) = (report.view.percentage, report.percentage_remark)
    {
        section.push_str(&format!(
            "- **Equivalent Percentage:** {:.2}% ({} {})\n",
            percentage,
            remark.emoji(),
            remark
        ));
    }

    if let (Some(score), Some(credits)) = (report.total_score, report.total_credits) {
        section.push_str(&format!(
            "- **Semesters Counted:** {}\n- **Total C*G Score:** {}\n- **Total Credits:** {}\n",
            report.eligible_count,
            format_number(score),
            format_number(credits)
        ));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SessionReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn display_field(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Print whole numbers without a trailing ".0".
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}
