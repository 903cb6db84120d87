//! tiersort Domain Layer
//!
//! This crate contains the retention rules of tiersort: the value types, the tier
//! classifier, the collision resolver and the trait describing the filesystem the
//! engine works against. It performs no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Tier**: retention bucket (Future, Yearly, Monthly, Daily, Weekly) bound to a folder
//! - **TrackedFile**: a file discovered under the backup root, identified by its path
//! - **Classification**: `(mtime, reference time)` → tier or expiry
//! - **Placement**: what to do when a file lands on a destination that may be occupied
//!
//! ## Architecture
//!
//! - Pure functions only; the reference time is always passed in explicitly
//! - Calendar arithmetic comes from `chrono`, always in UTC
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod collision;
pub mod file;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use classify::classify;
pub use collision::{
    duplicate_path, free_duplicate_path, resolve, PlacementAction, PlacementDecision,
};
pub use file::TrackedFile;
pub use tier::{Tier, TierOutcome};
pub use traits::{FailureKind, FilesystemPort, PortError};
