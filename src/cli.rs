//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::input::{parse_pair, SemesterEntry};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// cgpa - semester CGPA and percentage calculator
///
/// Enter the C*G score (sum of credit x grade point) and the credits for
/// each semester; cgpa reports the cumulative GPA and the equivalent
/// percentage.
///
/// Examples:
///   cgpa --semester 210:18 --semester 180:20
///   cgpa --semester 210:18 --percentage --format markdown
///   cgpa --input semesters.toml --percentage --format json
///   cgpa --interactive
///   cgpa --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Semester score and credits as SCORE:CREDIT
    ///
    /// Repeat for each semester; pairs fill semesters 1, 2, ... in order.
    /// Either side may be left empty (e.g. "210:") to skip that field.
    #[arg(short, long, value_name = "SCORE:CREDIT", value_parser = parse_pair)]
    pub semester: Vec<SemesterEntry>,

    /// Load semester entries from a TOML or JSON file
    ///
    /// Entries from the file are applied before any --semester pairs.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Also compute the equivalent percentage
    #[arg(short, long)]
    pub percentage: bool,

    /// Start an interactive session
    ///
    /// Any --semester or --input entries are loaded first.
    #[arg(short, long)]
    pub interactive: bool,

    /// Output format (text, markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of semester slots
    #[arg(long, value_name = "COUNT")]
    pub semesters: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cgpa.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "CGPA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .cgpa.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text summary (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(count) = self.semesters {
            if count == 0 {
                return Err("Semester count must be at least 1".to_string());
            }
            if self.semester.len() > count {
                return Err(format!(
                    "Got {} --semester pairs but only {} semester slots",
                    self.semester.len(),
                    count
                ));
            }
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        if !self.interactive && self.semester.is_empty() && self.input.is_none() {
            return Err(
                "Nothing to compute: pass --semester, --input or --interactive".to_string(),
            );
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
