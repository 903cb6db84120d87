//! Configuration for Janitor operations
//!
//! Defines the retry budget for physical effects and the optional run modes.

use crate::retry::RetryPolicy;
use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a reconciliation run
///
/// # Examples
///
/// ```
/// use tiersort_janitor::JanitorConfig;
///
/// // Default configuration: 3 attempts, 1 second apart
/// let config = JanitorConfig::default();
/// assert_eq!(config.retry_attempts, 3);
///
/// // Cautious: plan only, touch nothing
/// let config = JanitorConfig::cautious();
/// assert!(config.dry_run);
///
/// // Patient: more attempts for flaky network shares
/// let config = JanitorConfig::patient();
/// assert_eq!(config.retry_attempts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// How many times a move or delete is attempted before the file is reported as failed
    /// Default: 3
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Pause between two attempts (in milliseconds)
    /// Default: 1000
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Dry-run mode: log what would be moved or deleted without touching anything
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Keep only the newest Weekly snapshot of each calendar day
    /// Default: false
    #[serde(default)]
    pub prune_weekly_per_day: bool,
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for JanitorConfig {
    /// Create default configuration
    ///
    /// - Retry attempts: 3
    /// - Retry delay: 1 second
    /// - Dry run: off
    /// - Weekly per-day pruning: off
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            dry_run: false,
            prune_weekly_per_day: false,
        }
    }
}

impl JanitorConfig {
    /// Dry-run configuration: classify and plan, but never touch the filesystem
    pub fn cautious() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Configuration for slow or flaky storage (network shares, USB disks)
    ///
    /// - Retry attempts: 5
    /// - Retry delay: 2 seconds
    pub fn patient() -> Self {
        Self {
            retry_attempts: 5,
            retry_delay_ms: 2000,
            ..Self::default()
        }
    }

    /// Get retry delay as Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Retry policy for physical effects
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_delay())
    }

    /// Check the configuration for values the engine cannot work with
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.retry_attempts == 0 {
            return Err(JanitorError::Config(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        // A few seconds per failed file at most
        if self.retry_delay_ms > 60_000 {
            return Err(JanitorError::Config(format!(
                "retry_delay_ms must not exceed 60000 (got {})",
                self.retry_delay_ms
            )));
        }
        Ok(())
    }
}
