//! tiersort Storage Layer
//!
//! Implements the [`FilesystemPort`] trait on the local disk.
//!
//! # Architecture
//!
//! - `walkdir` for recursive listing (sorted by file name so runs are reproducible)
//! - `std::fs` for stat, mkdir, rename and remove
//! - Cross-device moves fall back to copy + remove, keeping the original mtime
//! - `io::ErrorKind` is mapped onto [`FailureKind`] so the engine knows what to retry
//!
//! # Examples
//!
//! ```no_run
//! use tiersort_domain::FilesystemPort;
//! use tiersort_store::FsStore;
//! use std::path::Path;
//!
//! let store = FsStore::open("/srv/backups").unwrap();
//! let files = store.list_files(Path::new("/srv/backups/Daily")).unwrap();
//! println!("{} daily snapshots", files.len());
//! ```

#![warn(missing_docs)]

use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tiersort_domain::{FailureKind, FilesystemPort, PortError, TrackedFile};
use walkdir::WalkDir;

/// Errors that can occur during filesystem operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// An I/O call failed on a specific path
    #[error("Failed to {op} '{}': {source}", path.display())]
    Io {
        /// Operation that failed (stat, move, delete, ...)
        op: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The backup root is missing or is not a directory
    #[error("Path '{}' does not exist or is not a directory.", .0.display())]
    NotADirectory(PathBuf),

    /// Something other than a regular file sits at a path where a file was expected
    #[error("'{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),
}

impl StoreError {
    fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl PortError for StoreError {
    fn kind(&self) -> FailureKind {
        match self {
            StoreError::Io { source, .. } => classify_io_error(source),
            StoreError::NotADirectory(_) | StoreError::NotAFile(_) => FailureKind::Unexpected,
        }
    }
}

/// Map an I/O error onto the failure categories the engine understands
pub fn classify_io_error(err: &io::Error) -> FailureKind {
    // Windows reports locked files as sharing/lock violations
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(32) | Some(33)) {
        return FailureKind::Transient;
    }

    match err.kind() {
        ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
        ErrorKind::WouldBlock
        | ErrorKind::TimedOut
        | ErrorKind::Interrupted
        | ErrorKind::ResourceBusy => FailureKind::Transient,
        _ => FailureKind::Unexpected,
    }
}

/// Local-disk implementation of [`FilesystemPort`]
///
/// Counts every successful mutation (mkdir, move, delete) so callers can check
/// that a run changed nothing.
#[derive(Debug, Default)]
pub struct FsStore {
    mutations: usize,
}

impl FsStore {
    /// Create a store without validating any root
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store for the backup tree at `root`, which must be an existing directory
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(StoreError::NotADirectory(root.to_path_buf()));
        }
        Ok(Self::new())
    }

    /// Number of successful mutations performed through this store
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    fn tracked(path: &Path, metadata: &fs::Metadata) -> Result<TrackedFile, StoreError> {
        let modified = metadata
            .modified()
            .map_err(|e| StoreError::io("read mtime of", path, e))?;
        Ok(TrackedFile::new(
            path,
            DateTime::<Utc>::from(modified),
            metadata.len(),
        ))
    }

    /// Copy `from` to `to` keeping its modification time, then remove `from`
    fn copy_then_remove(from: &Path, to: &Path) -> Result<(), StoreError> {
        let modified = fs::metadata(from)
            .and_then(|m| m.modified())
            .map_err(|e| StoreError::io("stat", from, e))?;

        fs::copy(from, to).map_err(|e| StoreError::io("copy", from, e))?;
        fs::File::options()
            .write(true)
            .open(to)
            .and_then(|f| f.set_modified(modified))
            .map_err(|e| StoreError::io("restore mtime of", to, e))?;
        fs::remove_file(from).map_err(|e| StoreError::io("remove", from, e))
    }
}

impl FilesystemPort for FsStore {
    type Error = StoreError;

    fn list_files(&self, dir: &Path) -> Result<Vec<TrackedFile>, Self::Error> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop"));
                    return Err(StoreError::io("list", dir, source));
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under '{}': {}", dir.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let tracked = entry
                .metadata()
                .map_err(|e| e.to_string())
                .and_then(|m| Self::tracked(entry.path(), &m).map_err(|e| e.to_string()));
            match tracked {
                Ok(file) => files.push(file),
                Err(e) => tracing::warn!("Skipping '{}': {}", entry.path().display(), e),
            }
        }

        Ok(files)
    }

    fn stat(&self, path: &Path) -> Result<TrackedFile, Self::Error> {
        let metadata = fs::metadata(path).map_err(|e| StoreError::io("stat", path, e))?;
        if !metadata.is_file() {
            return Err(StoreError::NotAFile(path.to_path_buf()));
        }
        Self::tracked(path, &metadata)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn mkdir_all(&mut self, path: &Path) -> Result<(), Self::Error> {
        if path.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(path).map_err(|e| StoreError::io("create directory", path, e))?;
        self.mutations += 1;
        Ok(())
    }

    fn move_file(&mut self, src: &Path, dst: &Path) -> Result<(), Self::Error> {
        if src == dst {
            return Ok(());
        }

        match fs::rename(src, dst) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::CrossesDevices => Self::copy_then_remove(src, dst)?,
            Err(e) => return Err(StoreError::io("move", src, e)),
        }

        self.mutations += 1;
        Ok(())
    }

    fn delete_file(&mut self, path: &Path) -> Result<(), Self::Error> {
        fs::remove_file(path).map_err(|e| StoreError::io("delete", path, e))?;
        self.mutations += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_classification() {
        let denied = io::Error::from(ErrorKind::PermissionDenied);
        let busy = io::Error::from(ErrorKind::WouldBlock);
        let missing = io::Error::from(ErrorKind::NotFound);

        assert_eq!(classify_io_error(&denied), FailureKind::PermissionDenied);
        assert_eq!(classify_io_error(&busy), FailureKind::Transient);
        assert_eq!(classify_io_error(&missing), FailureKind::Unexpected);
    }

    #[test]
    fn test_store_error_kind_and_message() {
        let err = StoreError::io(
            "delete",
            Path::new("/b/x.txt"),
            io::Error::from(ErrorKind::PermissionDenied),
        );

        assert_eq!(err.kind(), FailureKind::PermissionDenied);
        assert!(err.to_string().starts_with("Failed to delete '/b/x.txt'"));
    }

    #[test]
    fn test_open_rejects_missing_root() {
        let result = FsStore::open("/definitely/not/a/real/backup/root");
        assert!(matches!(result, Err(StoreError::NotADirectory(_))));
    }
}
