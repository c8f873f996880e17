//! Interactive calculator session.
//!
//! Reads one command per line, turns it into a session [`Action`] and
//! prints the outcome. Rejected actions are reported as warnings and the
//! session carries on with its previous state.

use crate::analysis::PercentageFormula;
use crate::models::Field;
use crate::report::{generate_records_text, generate_results_text, SessionReport};
use crate::session::{Action, AggregatorState};
use anyhow::{Context, Result};
use std::io::{BufRead, ErrorKind, Write};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  score <semester> [value]    set the C*G score (omit value to clear)
  credit <semester> [value]   set the credits (omit value to clear)
  cgpa                        calculate CGPA
  percentage                  calculate equivalent percentage
  clear                       clear all semesters
  show                        list semesters and results
  help                        show this help
  quit                        leave the session
";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Apply(Action),
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Ok(None);
    };

    let command = match keyword.to_lowercase().as_str() {
        "score" | "credit" => {
            let field = if keyword.eq_ignore_ascii_case("score") {
                Field::Score
            } else {
                Field::Credit
            };

            let id = parts
                .next()
                .ok_or_else(|| format!("usage: {} <semester> [value]", field))?;
            let id: u32 = id
                .parse()
                .map_err(|_| format!("'{}' is not a semester number", id))?;

            let value = parts.collect::<Vec<_>>().join(" ");
            Command::Apply(Action::Edit { id, field, value })
        }
        "cgpa" => Command::Apply(Action::ComputeCgpa),
        "percentage" | "percent" => Command::Apply(Action::ComputePercentage),
        "clear" => Command::Apply(Action::ClearAll),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}' (type 'help')", other)),
    };

    Ok(Some(command))
}

/// Run the session until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    state: &mut AggregatorState,
    formula: &PercentageFormula,
    input: R,
    mut output: W,
) -> Result<()> {
    writeln!(
        output,
        "CGPA Calculator: {} semesters. Type 'help' for commands.",
        state.semester_count()
    )?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Ignoring input line: {}", e);
                writeln!(output, "⚠️  Input is not valid UTF-8; line ignored")?;
                continue;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(output, "{}", message)?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => write!(output, "{}", HELP)?,
            Command::Show => {
                write!(output, "{}", generate_records_text(state.records()))?;
                write!(output, "{}", generate_results_text(&SessionReport::from_state(state)))?;
            }
            Command::Apply(action) => {
                debug!("Applying {:?}", action);
                match state.apply(&action, formula) {
                    Ok(()) => report_success(&mut output, state, &action)?,
                    Err(e) => {
                        warn!("Rejected {:?}: {}", action, e);
                        writeln!(output, "⚠️  {}", e)?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn report_success<W: Write>(output: &mut W, state: &AggregatorState, action: &Action) -> Result<()> {
    match action {
        Action::Edit { id, field, .. } => {
            if let Some(record) = state.record(*id) {
                let value = record.get(*field);
                if value.is_empty() {
                    writeln!(output, "Semester {} {} cleared", id, field)?;
                } else {
                    writeln!(output, "Semester {} {} = {}", id, field, value)?;
                }
            }
        }
        Action::ComputeCgpa | Action::ComputePercentage => {
            write!(output, "{}", generate_results_text(&SessionReport::from_state(state)))?;
        }
        Action::ClearAll => writeln!(output, "All semesters cleared")?,
    }

    Ok(())
}
