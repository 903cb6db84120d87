//! Collision resolution
//!
//! Decides what happens when a file is about to be placed at a destination path.
//! The outcome only depends on the two modification times, never on which file was
//! discovered first:
//!
//! | Situation | Action |
//! |-----------|--------|
//! | destination free | [`PlacementAction::Move`] |
//! | destination is the incoming file itself | [`PlacementAction::NoOp`] |
//! | occupant older than incoming | [`PlacementAction::Replace`] |
//! | occupant newer than incoming | [`PlacementAction::DeleteIncoming`] |
//! | identical mtimes | [`PlacementAction::RenameAndMove`] to a `_duplicate` name |

use crate::file::TrackedFile;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix appended to the stem of a file that ties with the destination occupant
pub const DUPLICATE_SUFFIX: &str = "_duplicate";

/// Physical effect chosen for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementAction {
    /// Move the incoming file to the (free) target
    Move,

    /// Delete the occupant of the target, then move the incoming file there
    Replace,

    /// Move the incoming file to a fresh `_duplicate` name beside the occupant
    RenameAndMove,

    /// Delete the incoming file and leave the target untouched
    DeleteIncoming,

    /// Delete the file at the target (displaced by a better candidate)
    DeleteExisting,

    /// Nothing to do
    NoOp,
}

impl PlacementAction {
    /// Short lowercase label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementAction::Move => "move",
            PlacementAction::Replace => "replace",
            PlacementAction::RenameAndMove => "rename-and-move",
            PlacementAction::DeleteIncoming => "delete-incoming",
            PlacementAction::DeleteExisting => "delete-existing",
            PlacementAction::NoOp => "no-op",
        }
    }

    /// Whether carrying out this action changes the filesystem
    pub fn is_mutation(&self) -> bool {
        !matches!(self, PlacementAction::NoOp)
    }
}

impl fmt::Display for PlacementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a file goes and how it gets there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
    /// Destination path (absent for plain expiry deletes and no-ops)
    pub target: Option<PathBuf>,

    /// Effect to carry out
    pub action: PlacementAction,
}

impl PlacementDecision {
    /// Move to a free destination
    pub fn move_to(target: impl Into<PathBuf>) -> Self {
        Self {
            target: Some(target.into()),
            action: PlacementAction::Move,
        }
    }

    /// Replace the occupant of `target`
    pub fn replace(target: impl Into<PathBuf>) -> Self {
        Self {
            target: Some(target.into()),
            action: PlacementAction::Replace,
        }
    }

    /// Move under a disambiguated duplicate name
    pub fn rename_and_move(target: impl Into<PathBuf>) -> Self {
        Self {
            target: Some(target.into()),
            action: PlacementAction::RenameAndMove,
        }
    }

    /// Drop the incoming file because `kept` holds a newer version
    pub fn discard_incoming(kept: impl Into<PathBuf>) -> Self {
        Self {
            target: Some(kept.into()),
            action: PlacementAction::DeleteIncoming,
        }
    }

    /// Drop the file at `path` because a newer candidate supersedes it
    pub fn discard_existing(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Some(path.into()),
            action: PlacementAction::DeleteExisting,
        }
    }

    /// Leave everything as it is
    pub fn no_op() -> Self {
        Self {
            target: None,
            action: PlacementAction::NoOp,
        }
    }
}

/// Resolve the placement of `incoming` at `destination`
///
/// `existing` is the file currently occupying `destination`, if any. `is_taken` reports
/// whether a candidate path is already in use and is only consulted on exact ties, to
/// pick a free `_duplicate` name.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use tiersort_domain::{resolve, PlacementAction, TrackedFile};
/// use std::path::Path;
///
/// let now = Utc::now();
/// let dest = Path::new("/b/Weekly/db.sql");
/// let incoming = TrackedFile::new("/b/db.sql", now, 10);
/// let existing = TrackedFile::new(dest, now - Duration::hours(1), 10);
///
/// let decision = resolve(&incoming, Some(&existing), dest, |_| true);
/// assert_eq!(decision.action, PlacementAction::Replace);
/// ```
pub fn resolve<F>(
    incoming: &TrackedFile,
    existing: Option<&TrackedFile>,
    destination: &Path,
    is_taken: F,
) -> PlacementDecision
where
    F: Fn(&Path) -> bool,
{
    let Some(existing) = existing else {
        return PlacementDecision::move_to(destination);
    };

    if existing.path == incoming.path {
        return PlacementDecision::no_op();
    }

    if existing.modified < incoming.modified {
        PlacementDecision::replace(destination)
    } else if existing.modified > incoming.modified {
        PlacementDecision::discard_incoming(destination)
    } else {
        PlacementDecision::rename_and_move(free_duplicate_path(destination, is_taken))
    }
}

/// First `_duplicate` variant of `destination` that `is_taken` reports as free
///
/// Tries `stem_duplicate.ext`, then `stem_duplicate_2.ext`, `stem_duplicate_3.ext`, ...
pub fn free_duplicate_path<F>(destination: &Path, is_taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    (1..u32::MAX)
        .map(|n| duplicate_path(destination, n))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| duplicate_path(destination, u32::MAX))
}

/// The `n`-th duplicate name for `destination` (`n` starts at 1)
///
/// # Examples
///
/// ```
/// use tiersort_domain::duplicate_path;
/// use std::path::{Path, PathBuf};
///
/// let dest = Path::new("/b/Daily/site.tar.gz");
/// assert_eq!(duplicate_path(dest, 1), PathBuf::from("/b/Daily/site.tar_duplicate.gz"));
/// assert_eq!(duplicate_path(dest, 2), PathBuf::from("/b/Daily/site.tar_duplicate_2.gz"));
/// ```
pub fn duplicate_path(destination: &Path, n: u32) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = if n <= 1 {
        format!("{stem}{DUPLICATE_SUFFIX}")
    } else {
        format!("{stem}{DUPLICATE_SUFFIX}_{n}")
    };

    if let Some(ext) = destination.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }

    destination.with_file_name(name)
}
