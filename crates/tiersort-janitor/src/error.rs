//! Error types for Janitor operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole reconciliation run
///
/// Failures on individual files never surface here; they are collected in the
/// [`RunReport`](crate::RunReport) instead.
#[derive(Error, Debug)]
pub enum JanitorError {
    /// The backup root is missing or not a directory
    #[error("Path '{}' does not exist or is not a directory.", .0.display())]
    InvalidRoot(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
