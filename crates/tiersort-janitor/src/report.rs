//! Outcome collection for reconciliation runs

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use tiersort_domain::{FailureKind, PlacementAction, Tier};

/// One action the engine took (or planned, in dry-run mode) for a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAction {
    /// File the action applied to
    pub path: PathBuf,

    /// What was done
    pub action: PlacementAction,

    /// Destination, or the kept/displaced path for deletions
    pub target: Option<PathBuf>,

    /// Tier the file was classified into; `None` for expired files
    pub tier: Option<Tier>,
}

/// A file the engine could not process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// File (or folder, for listing failures) that failed
    pub path: PathBuf,

    /// Failure category
    pub kind: FailureKind,

    /// Human-readable error
    pub message: String,
}

/// Report of a single reconciliation run
///
/// Tracks files moved, replaced, duplicated and discarded per tier, expired and pruned
/// files, and every per-file failure.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Reference time every classification in the run used
    pub reference_time: DateTime<Utc>,

    /// Whether the run only planned its actions
    pub dry_run: bool,

    /// Files moved into a free slot, per target tier
    pub moved: HashMap<Tier, usize>,

    /// Files that replaced an older version, per target tier
    pub replaced: HashMap<Tier, usize>,

    /// Files kept under a `_duplicate` name, per target tier
    pub duplicates: HashMap<Tier, usize>,

    /// Files dropped because the destination already held a newer version, per target tier
    pub discarded: HashMap<Tier, usize>,

    /// Files deleted because no retention rule kept them
    pub expired: usize,

    /// Weekly snapshots deleted because a newer one exists for the same day
    pub pruned: usize,

    /// Files already in the right tier
    pub unchanged: usize,

    /// Every action, in the order it happened
    pub actions: Vec<FileAction>,

    /// Every per-file failure
    pub failures: Vec<FileFailure>,

    /// Wall-clock duration of the run in milliseconds
    pub runtime_ms: u64,
}

impl RunReport {
    /// Create an empty report for a run at `reference_time`
    pub fn new(reference_time: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            reference_time,
            dry_run,
            ..Self::default()
        }
    }

    /// Record an action and update the counters
    pub fn record(&mut self, action: FileAction) {
        match (action.action, action.tier) {
            (PlacementAction::NoOp, _) => self.unchanged += 1,
            (PlacementAction::DeleteIncoming, None) => self.expired += 1,
            (PlacementAction::DeleteExisting, _) => self.pruned += 1,
            (kind, Some(tier)) => {
                let counter = match kind {
                    PlacementAction::Move => &mut self.moved,
                    PlacementAction::Replace => &mut self.replaced,
                    PlacementAction::RenameAndMove => &mut self.duplicates,
                    _ => &mut self.discarded,
                };
                *counter.entry(tier).or_insert(0) += 1;
            }
            // Placements always carry a tier
            (_, None) => {}
        }

        if action.action.is_mutation() {
            self.actions.push(action);
        }
    }

    /// Record a per-file failure
    pub fn record_failure(
        &mut self,
        path: impl Into<PathBuf>,
        kind: FailureKind,
        message: impl Into<String>,
    ) {
        self.failures.push(FileFailure {
            path: path.into(),
            kind,
            message: message.into(),
        });
    }

    /// Files moved into a tier, whichever way they got there
    pub fn total_placed(&self) -> usize {
        self.moved.values().sum::<usize>()
            + self.replaced.values().sum::<usize>()
            + self.duplicates.values().sum::<usize>()
    }

    /// Files deleted for any reason (including replaced occupants)
    pub fn total_deleted(&self) -> usize {
        self.expired
            + self.pruned
            + self.discarded.values().sum::<usize>()
            + self.replaced.values().sum::<usize>()
    }

    /// Number of filesystem-changing actions taken (or planned)
    pub fn total_actions(&self) -> usize {
        self.actions.len()
    }

    /// Whether every file was processed without error
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files placed in `tier`
    pub fn placed_in(&self, tier: Tier) -> usize {
        [&self.moved, &self.replaced, &self.duplicates]
            .iter()
            .filter_map(|counter| counter.get(&tier))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(action: PlacementAction, tier: Option<Tier>) -> FileAction {
        FileAction {
            path: PathBuf::from("/b/x.txt"),
            action,
            target: None,
            tier,
        }
    }

    #[test]
    fn test_report_creation() {
        let report = RunReport::new(Utc::now(), false);
        assert_eq!(report.total_placed(), 0);
        assert_eq!(report.total_deleted(), 0);
        assert_eq!(report.total_actions(), 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_record_placements() {
        let mut report = RunReport::default();
        report.record(action(PlacementAction::Move, Some(Tier::Daily)));
        report.record(action(PlacementAction::Move, Some(Tier::Daily)));
        report.record(action(PlacementAction::Replace, Some(Tier::Weekly)));
        report.record(action(PlacementAction::RenameAndMove, Some(Tier::Weekly)));

        assert_eq!(report.moved.get(&Tier::Daily), Some(&2));
        assert_eq!(report.placed_in(Tier::Weekly), 2);
        assert_eq!(report.total_placed(), 4);
        // The replaced occupant counts as a deletion
        assert_eq!(report.total_deleted(), 1);
        assert_eq!(report.total_actions(), 4);
    }

    #[test]
    fn test_record_deletions() {
        let mut report = RunReport::default();
        report.record(action(PlacementAction::DeleteIncoming, None));
        report.record(action(PlacementAction::DeleteIncoming, Some(Tier::Monthly)));
        report.record(action(PlacementAction::DeleteExisting, Some(Tier::Weekly)));

        assert_eq!(report.expired, 1);
        assert_eq!(report.discarded.get(&Tier::Monthly), Some(&1));
        assert_eq!(report.pruned, 1);
        assert_eq!(report.total_deleted(), 3);
    }

    #[test]
    fn test_noop_is_not_an_action() {
        let mut report = RunReport::default();
        report.record(action(PlacementAction::NoOp, Some(Tier::Daily)));

        assert_eq!(report.unchanged, 1);
        assert_eq!(report.total_actions(), 0);
    }

    #[test]
    fn test_record_failure() {
        let mut report = RunReport::default();
        report.record_failure("/b/locked.bak", FailureKind::Transient, "busy");

        assert!(!report.is_clean());
        assert_eq!(report.failures[0].kind, FailureKind::Transient);
    }
}
