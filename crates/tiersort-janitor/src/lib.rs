//! tiersort Janitor
//!
//! Reconciliation engine that keeps a backup tree sorted into retention tiers.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Rechecking**: re-classifying files in time-sensitive tier folders, since a file's
//!   tier changes as it ages
//! - **Sorting**: classifying every untiered file and moving it into its tier folder
//! - **Collision handling**: newer content wins, exact ties are kept as `_duplicate`
//! - **Expiry**: deleting files no retention rule keeps
//! - **Reporting**: counting every action and collecting per-file failures
//!
//! ## Tiers
//!
//! | Tier | Folder | Rule | Rechecked every run |
//! |------|--------|------|---------------------|
//! | **Future** | `_FutureFiles` | mtime after the reference time | yes |
//! | **Yearly** | `Yearly` | December 31st | no |
//! | **Monthly** | `Monthly` | 25th of any month | no |
//! | **Daily** | `Daily` | same UTC day as the reference time | yes |
//! | **Weekly** | `Weekly` | at most 7 days old | yes |
//!
//! Anything else is deleted.
//!
//! # Usage
//!
//! ```no_run
//! use tiersort_janitor::{Janitor, JanitorConfig};
//! use tiersort_store::FsStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = FsStore::open("/srv/backups")?;
//! let janitor = Janitor::new(JanitorConfig::default());
//!
//! let report = janitor.run_now("/srv/backups".as_ref(), &mut store)?;
//! println!("Placed: {}", report.total_placed());
//! println!("Deleted: {}", report.total_deleted());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! retry_attempts = 3
//! retry_delay_ms = 1000
//! dry_run = false
//! prune_weekly_per_day = false
//! ```
//!
//! A run is idempotent: running it twice at the same reference time with no new files
//! changes nothing the second time.

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod report;
mod retry;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::Janitor;
pub use report::{FileAction, FileFailure, RunReport};
pub use retry::RetryPolicy;
