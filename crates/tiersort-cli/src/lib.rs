//! tiersort CLI library.
//!
//! Argument parsing, configuration loading and summary formatting for the `tiersort`
//! binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat};
pub use config::{Config, OutputFormat, Settings};
pub use error::{CliError, Result};
pub use output::Formatter;
