//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// tiersort - Sort a backup folder into Daily, Weekly, Monthly and Yearly retention tiers.
#[derive(Debug, Parser)]
#[command(name = "tiersort")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Root of the backup tree to reconcile
    pub root: PathBuf,

    /// Log what would be moved or deleted without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Keep only the newest Weekly backup of each day
    #[arg(long)]
    pub prune_weekly: bool,

    /// Configuration file path
    #[arg(short, long, env = "TIERSORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, value_enum)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log every decision, including files left in place
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and failures
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line of totals)
    Quiet,
}

impl Cli {
    /// Default tracing filter for the chosen verbosity; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
