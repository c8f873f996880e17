//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cgpa.toml` files.

use crate::cli::OutputFormat;
use crate::session::DEFAULT_SEMESTER_COUNT;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".cgpa.toml";

/// Upper bound on semester slots.
const MAX_SEMESTERS: usize = 24;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Semester layout.
    #[serde(default)]
    pub semesters: SemestersConfig,

    /// CGPA to percentage conversion.
    #[serde(default)]
    pub formula: FormulaConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Write reports to this file instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Semester layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemestersConfig {
    /// Number of semester slots in a session.
    #[serde(default = "default_count")]
    pub count: usize,
}

impl Default for SemestersConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
        }
    }
}

fn default_count() -> usize {
    DEFAULT_SEMESTER_COUNT
}

/// Percentage conversion coefficients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaConfig {
    /// CGPA at which the upper slope starts to apply.
    #[serde(default = "default_boundary")]
    pub boundary: f64,

    /// Slope below the boundary.
    #[serde(default = "default_lower_slope")]
    pub lower_slope: f64,

    /// Slope at or above the boundary.
    #[serde(default = "default_upper_slope")]
    pub upper_slope: f64,

    /// Constant added after scaling.
    #[serde(default = "default_intercept")]
    pub intercept: f64,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            boundary: default_boundary(),
            lower_slope: default_lower_slope(),
            upper_slope: default_upper_slope(),
            intercept: default_intercept(),
        }
    }
}

fn default_boundary() -> f64 {
    7.0
}

fn default_lower_slope() -> f64 {
    7.1
}

fn default_upper_slope() -> f64 {
    7.4
}

fn default_intercept() -> f64 {
    12.0
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.cgpa.toml` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.semesters.count == 0 || self.semesters.count > MAX_SEMESTERS {
            bail!(
                "semesters.count must be between 1 and {}, got {}",
                MAX_SEMESTERS,
                self.semesters.count
            );
        }

        let formula = &self.formula;
        let coefficients = [
            ("boundary", formula.boundary),
            ("lower_slope", formula.lower_slope),
            ("upper_slope", formula.upper_slope),
            ("intercept", formula.intercept),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() {
                bail!("formula.{} must be a finite number", name);
            }
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(count) = args.semesters {
            self.semesters.count = count;
        }

        if let Some(format) = args.format {
            self.general.format = format;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.semesters.count, 8);
        assert_eq!(config.formula.boundary, 7.0);
        assert_eq!(config.formula.lower_slope, 7.1);
        assert_eq!(config.formula.upper_slope, 7.4);
        assert_eq!(config.formula.intercept, 12.0);
        assert_eq!(config.general.format, OutputFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
format = "json"

[semesters]
count = 10

[formula]
upper_slope = 7.5
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.semesters.count, 10);
        assert_eq!(config.formula.upper_slope, 7.5);
        assert_eq!(config.formula.lower_slope, 7.1);
    }

    #[test]
    fn test_validate_rejects_zero_semesters() {
        let mut config = Config::default();
        config.semesters.count = 0;
        assert!(config.validate().is_err());

        config.semesters.count = MAX_SEMESTERS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[semesters]\ncount = 6\n",
        )
        .unwrap();

        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.semesters.count, 6);
    }

    #[test]
    fn test_load_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[semesters]\ncount = \"many\"\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[semesters]"));
        assert!(toml_str.contains("[formula]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.semesters.count, 8);
    }
}
