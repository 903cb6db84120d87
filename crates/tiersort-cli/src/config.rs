//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tiersort_janitor::JanitorConfig;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reconciliation settings
    #[serde(default)]
    pub janitor: JanitorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".tiersort").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if there is no file.
    ///
    /// Without a home directory there is no default path, so defaults apply.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::debug!("{}, using defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at '{}', using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.janitor.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.dry_run {
            self.janitor.dry_run = true;
        }
        if cli.prune_weekly {
            self.janitor.prune_weekly_per_day = true;
        }
        if let Some(format) = cli.format {
            self.settings.format = format.into();
        }
        if cli.no_color {
            self.settings.color = false;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.janitor, JanitorConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(!config.janitor.dry_run);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[janitor]\nretry_attempts = 5\n\n[settings]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.janitor.retry_attempts, 5);
        assert_eq!(config.janitor.retry_delay_ms, 1000);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[janitor\nretry_attempts = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[janitor]\nretry_attempts = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Janitor(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        let cli = Cli::parse_from([
            "tiersort",
            "/b",
            "--dry-run",
            "--prune-weekly",
            "--format",
            "quiet",
            "--no-color",
        ]);

        config.apply_cli(&cli);
        assert!(config.janitor.dry_run);
        assert!(config.janitor.prune_weekly_per_day);
        assert_eq!(config.settings.format, OutputFormat::Quiet);
        assert!(!config.settings.color);
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let mut config = Config::default();
        config.janitor.dry_run = true;
        config.settings.format = OutputFormat::Json;

        config.apply_cli(&Cli::parse_from(["tiersort", "/b"]));
        assert!(config.janitor.dry_run);
        assert_eq!(config.settings.format, OutputFormat::Json);
    }
}
