//! cgpa - Semester CGPA and percentage calculator
//!
//! A CLI tool that aggregates per-semester C*G scores and credits into a
//! cumulative grade point average and converts it to a percentage.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad input, config, I/O) or no semester could be counted

mod analysis;
mod cli;
mod config;
mod error;
mod input;
mod models;
mod repl;
mod report;
mod session;

use analysis::PercentageFormula;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use report::SessionReport;
use session::{Action, AggregatorState};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    debug!("cgpa v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_calculator(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Calculation failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .cgpa.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the semester count or the percentage formula.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so reports on stdout stay clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run a one-shot calculation or an interactive session. Returns the exit code.
fn run_calculator(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate().context("Invalid settings")?;

    let formula = PercentageFormula::from(&config.formula);
    let mut state = AggregatorState::new(config.semesters.count);
    debug!("Session with {} semesters", state.semester_count());

    // Pairs given on the command line continue after the file's semesters.
    let mut next_id = 1;
    if let Some(ref path) = args.input {
        let entries = input::load_entries(path)?;
        next_id = input::apply_entries(&mut state, &entries, next_id, &formula)
            .with_context(|| format!("Failed to apply entries from {}", path.display()))?;
    }
    input::apply_entries(&mut state, &args.semester, next_id, &formula)?;

    if args.interactive {
        let stdin = std::io::stdin();
        repl::run(&mut state, &formula, stdin.lock(), std::io::stdout())?;

        if config.general.output.is_some() {
            write_report(&state, &config)?;
        }
        return Ok(0);
    }

    if let Err(e) = state.apply(&Action::ComputeCgpa, &formula) {
        warn!("{}", e);
        eprintln!("⚠️  {}", e);
        return Ok(1);
    }

    if args.percentage {
        if let Err(e) = state.apply(&Action::ComputePercentage, &formula) {
            warn!("{}", e);
            eprintln!("⚠️  {}", e);
            return Ok(1);
        }
    }

    write_report(&state, &config)?;
    Ok(0)
}

/// Render the session in the configured format and write it out.
fn write_report(state: &AggregatorState, config: &Config) -> Result<()> {
    let report = SessionReport::from_state(state);

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
        OutputFormat::Text => report::generate_text_report(&report),
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
