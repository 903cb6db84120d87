//! Trait definitions for external interactions
//!
//! These traits define the boundary between the retention logic and the filesystem.
//! Infrastructure implementations live in other crates.

use crate::TrackedFile;
use std::fmt;
use std::path::Path;

/// Broad category of a failed filesystem operation
///
/// Drives the retry policy: only transient failures are worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Lock held by another process, temporary unavailability, interrupted call
    Transient,

    /// The process may not touch this file
    PermissionDenied,

    /// Any other I/O failure
    Unexpected,
}

impl FailureKind {
    /// Whether another attempt might succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Transient)
    }

    /// Lowercase label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transient => "transient",
            FailureKind::PermissionDenied => "permission-denied",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by a [`FilesystemPort`] must say what kind of failure they are
pub trait PortError: fmt::Display {
    /// Category of this failure
    fn kind(&self) -> FailureKind;
}

/// Trait for the filesystem operations the retention engine needs
///
/// Implemented by the infrastructure layer (tiersort-store)
pub trait FilesystemPort {
    /// Error type for filesystem operations
    type Error: PortError;

    /// List every regular file below `dir`, recursively
    ///
    /// A missing directory yields an empty list.
    fn list_files(&self, dir: &Path) -> Result<Vec<TrackedFile>, Self::Error>;

    /// Read the metadata of a single regular file
    ///
    /// Directories and other non-file entries are an error, never a `TrackedFile`.
    fn stat(&self, path: &Path) -> Result<TrackedFile, Self::Error>;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Create `path` and all missing parents
    fn mkdir_all(&mut self, path: &Path) -> Result<(), Self::Error>;

    /// Move a file from `src` to `dst`
    fn move_file(&mut self, src: &Path, dst: &Path) -> Result<(), Self::Error>;

    /// Delete the file at `path`
    fn delete_file(&mut self, path: &Path) -> Result<(), Self::Error>;
}
