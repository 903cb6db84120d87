//! File module - a backup file discovered during a run

use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;

/// A file found under the backup root
///
/// Identity is the absolute path. Tracked files are discovered fresh on every run
/// and never persisted; the filesystem itself is the store of record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Absolute path of the file
    pub path: PathBuf,

    /// Last modification time (UTC)
    pub modified: DateTime<Utc>,

    /// Size in bytes
    pub size: u64,
}

impl TrackedFile {
    /// Create a new tracked file
    pub fn new(path: impl Into<PathBuf>, modified: DateTime<Utc>, size: u64) -> Self {
        Self {
            path: path.into(),
            modified,
            size,
        }
    }

    /// File name component, lossily converted to UTF-8
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use tiersort_domain::TrackedFile;
    ///
    /// let file = TrackedFile::new("/backups/db.sql.gz", Utc::now(), 0);
    /// assert_eq!(file.name(), "db.sql.gz");
    /// ```
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// UTC calendar date of the modification time
    pub fn modified_date(&self) -> NaiveDate {
        self.modified.date_naive()
    }
}
