//! Core Janitor implementation: reconciliation of a backup tree against its tiers

use crate::report::FileAction;
use crate::retry::RetryPolicy;
use crate::{JanitorConfig, JanitorError, RunReport};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tiersort_domain::{
    classify, resolve, FilesystemPort, PlacementAction, PlacementDecision, PortError, Tier,
    TierOutcome, TrackedFile,
};

/// Janitor service that sorts a backup tree into retention tiers
///
/// A run has up to three phases:
/// 1. **Recheck**: files already in `_FutureFiles`, `Daily` and `Weekly` are classified
///    again, since their tier changes as time advances
/// 2. **Sort**: every file outside the tier folders is classified and placed
/// 3. **Prune** (optional): only the newest Weekly snapshot of each day is kept
///
/// The reference time is fixed when the run starts and used for every decision.
///
/// # Examples
///
/// ```no_run
/// use tiersort_janitor::{Janitor, JanitorConfig};
/// use tiersort_store::FsStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = FsStore::open("/srv/backups")?;
/// let janitor = Janitor::new(JanitorConfig::default());
///
/// let report = janitor.run_now("/srv/backups".as_ref(), &mut store)?;
/// println!("{} placed, {} deleted", report.total_placed(), report.total_deleted());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self { config }
    }

    /// Reconcile `root` using the current time as the reference
    pub fn run_now<P: FilesystemPort>(
        &self,
        root: &Path,
        port: &mut P,
    ) -> Result<RunReport, JanitorError> {
        self.run(root, Utc::now(), port)
    }

    /// Reconcile `root` against the reference time `now`
    ///
    /// Only an invalid root or configuration aborts the run. Failures on single files
    /// are logged, recorded in the report, and the run carries on.
    pub fn run<P: FilesystemPort>(
        &self,
        root: &Path,
        now: DateTime<Utc>,
        port: &mut P,
    ) -> Result<RunReport, JanitorError> {
        self.config.validate()?;
        if !port.is_dir(root) {
            return Err(JanitorError::InvalidRoot(root.to_path_buf()));
        }

        let start = Instant::now();
        tracing::info!(
            "Reconciling '{}' (reference time {}{})",
            root.display(),
            now.to_rfc3339(),
            if self.config.dry_run { ", dry run" } else { "" }
        );

        let mut pass = Pass {
            root,
            now,
            port,
            dry_run: self.config.dry_run,
            retry: self.config.retry_policy(),
            placed: HashSet::new(),
            planned: HashMap::new(),
            report: RunReport::new(now, self.config.dry_run),
        };

        pass.recheck_tiers();
        pass.sort_untiered();
        if self.config.prune_weekly_per_day {
            pass.prune_weekly();
        }

        let mut report = pass.report;
        report.runtime_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            "Run completed: {} placed, {} deleted, {} unchanged, {} failed",
            report.total_placed(),
            report.total_deleted(),
            report.unchanged,
            report.failures.len()
        );

        Ok(report)
    }
}

/// State of one run in progress
struct Pass<'a, P: FilesystemPort> {
    root: &'a Path,
    now: DateTime<Utc>,
    port: &'a mut P,
    dry_run: bool,
    retry: RetryPolicy,
    /// Destinations filled during this run; skipped if a later listing sees them again
    placed: HashSet<PathBuf>,
    /// Dry runs only: what the tree would look like at each touched path.
    /// `None` marks a path the run would have emptied.
    planned: HashMap<PathBuf, Option<TrackedFile>>,
    report: RunReport,
}

impl<P: FilesystemPort> Pass<'_, P> {
    fn tier_dir(&self, tier: Tier) -> PathBuf {
        self.root.join(tier.folder_name())
    }

    /// Whether `file` sits inside one of the reserved tier folders under the root
    fn is_tiered(&self, file: &TrackedFile) -> bool {
        file.path
            .strip_prefix(self.root)
            .ok()
            .and_then(|rel| rel.components().next())
            .map(|first| Tier::is_reserved_name(&first.as_os_str().to_string_lossy()))
            .unwrap_or(false)
    }

    fn list(&mut self, dir: &Path) -> Vec<TrackedFile> {
        let mut files = match self.port.list_files(dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Failed to list '{}': {}", dir.display(), e);
                self.report.record_failure(dir, e.kind(), e.to_string());
                return Vec::new();
            }
        };

        if !self.planned.is_empty() {
            files.retain(|file| !self.planned.contains_key(&file.path));
            files.extend(
                self.planned
                    .values()
                    .flatten()
                    .filter(|file| file.path.starts_with(dir))
                    .cloned(),
            );
            files.sort_by(|a, b| a.path.cmp(&b.path));
        }
        files
    }

    /// Current occupant of `destination`, planned effects included
    fn occupant(&self, destination: &Path) -> Result<Option<TrackedFile>, P::Error> {
        if let Some(planned) = self.planned.get(destination) {
            return Ok(planned.clone());
        }
        if !self.port.exists(destination) {
            return Ok(None);
        }
        self.port.stat(destination).map(Some)
    }

    fn is_taken(&self, path: &Path) -> bool {
        match self.planned.get(path) {
            Some(planned) => planned.is_some(),
            None => self.port.exists(path),
        }
    }

    /// Remember the effect of a dry-run action so later decisions see it
    fn plan(&mut self, vacated: &Path, arrival: Option<(&TrackedFile, &Path)>) {
        if !self.dry_run {
            return;
        }
        self.planned.insert(vacated.to_path_buf(), None);
        if let Some((file, to)) = arrival {
            let moved = TrackedFile::new(to, file.modified, file.size);
            self.planned.insert(to.to_path_buf(), Some(moved));
        }
    }

    /// Phase A: classify files already sitting in time-sensitive tier folders
    fn recheck_tiers(&mut self) {
        for current in Tier::TIME_SENSITIVE {
            let dir = self.tier_dir(current);
            for file in self.list(&dir) {
                if self.placed.contains(&file.path) {
                    continue;
                }
                match classify(file.modified, self.now) {
                    TierOutcome::Keep(tier) if tier == current => self.unchanged(&file, tier),
                    TierOutcome::Keep(tier) => self.place(&file, tier),
                    TierOutcome::Expired => self.expire(&file),
                }
            }
        }
    }

    /// Phase B: classify and place every file outside the tier folders
    fn sort_untiered(&mut self) {
        let root = self.root.to_path_buf();
        let files: Vec<TrackedFile> = self
            .list(&root)
            .into_iter()
            .filter(|file| !self.is_tiered(file))
            .collect();

        for file in files {
            match classify(file.modified, self.now) {
                TierOutcome::Keep(tier) => self.place(&file, tier),
                TierOutcome::Expired => self.expire(&file),
            }
        }
    }

    /// Phase C: keep only the newest Weekly snapshot of each calendar day
    ///
    /// Snapshots with exactly the newest mtime of their day are all kept.
    fn prune_weekly(&mut self) {
        let files = self.list(&self.tier_dir(Tier::Weekly));

        let mut newest: BTreeMap<NaiveDate, TrackedFile> = BTreeMap::new();
        for file in &files {
            newest
                .entry(file.modified_date())
                .and_modify(|best| {
                    if file.modified > best.modified {
                        *best = file.clone();
                    }
                })
                .or_insert_with(|| file.clone());
        }

        for file in &files {
            let Some(best) = newest.get(&file.modified_date()) else {
                continue;
            };
            if file.modified < best.modified {
                tracing::info!(
                    "{}Deleting superseded weekly snapshot '{}' (keeping '{}')",
                    self.dry_run_prefix(),
                    file.path.display(),
                    best.name()
                );
                let decision = PlacementDecision::discard_existing(&file.path);
                self.execute(file, Tier::Weekly, decision);
            }
        }
    }

    fn unchanged(&mut self, file: &TrackedFile, tier: Tier) {
        tracing::debug!("Keeping '{}' in '{}'", file.path.display(), tier);
        self.report.record(FileAction {
            path: file.path.clone(),
            action: PlacementAction::NoOp,
            target: None,
            tier: Some(tier),
        });
    }

    /// Delete a file no retention rule keeps
    fn expire(&mut self, file: &TrackedFile) {
        tracing::info!("{}Deleting file: {}", self.dry_run_prefix(), file.path.display());

        if !self.dry_run {
            let what = format!("delete '{}'", file.path.display());
            let port = &mut *self.port;
            if let Err(e) = self.retry.run(&what, || port.delete_file(&file.path)) {
                self.fail(&file.path, &e);
                return;
            }
        }

        self.plan(&file.path, None);
        self.report.record(FileAction {
            path: file.path.clone(),
            action: PlacementAction::DeleteIncoming,
            target: None,
            tier: None,
        });
    }

    /// Move `file` into `tier`, resolving a collision with the current occupant
    fn place(&mut self, file: &TrackedFile, tier: Tier) {
        let dir = self.tier_dir(tier);
        if !self.dry_run {
            if let Err(e) = self.port.mkdir_all(&dir) {
                self.fail(&dir, &e);
                return;
            }
        }

        let destination = dir.join(file.name());
        let existing = match self.occupant(&destination) {
            Ok(existing) => existing,
            Err(e) => {
                // Something that is not a file (or cannot be read) blocks the slot
                self.fail(&file.path, &e);
                return;
            }
        };

        let decision = resolve(file, existing.as_ref(), &destination, |p| self.is_taken(p));
        self.execute(file, tier, decision);
    }

    /// Carry out a placement decision for `file`
    fn execute(&mut self, file: &TrackedFile, tier: Tier, decision: PlacementDecision) {
        let PlacementDecision { target, action } = decision;
        let prefix = self.dry_run_prefix();

        let outcome = match (action, target.as_deref()) {
            (PlacementAction::NoOp, _) => Ok(()),
            (PlacementAction::Move, Some(to)) => self.move_to(file, to).map(|()| {
                tracing::info!("{}Moved '{}' to '{}'", prefix, file.name(), tier);
            }),
            (PlacementAction::Replace, Some(to)) => self
                .delete(to)
                .and_then(|()| self.move_to(file, to))
                .map(|()| {
                    tracing::info!(
                        "{}Replaced '{}' in '{}' with newer version",
                        prefix,
                        file.name(),
                        tier
                    );
                }),
            (PlacementAction::RenameAndMove, Some(to)) => self.move_to(file, to).map(|()| {
                tracing::info!(
                    "{}Moved duplicate '{}' to '{}'",
                    prefix,
                    file.name(),
                    to.display()
                );
            }),
            (PlacementAction::DeleteIncoming, _) => self.delete(&file.path).map(|()| {
                tracing::info!(
                    "{}Removed older version of '{}' in '{}'",
                    prefix,
                    file.name(),
                    tier
                );
            }),
            (PlacementAction::DeleteExisting, Some(displaced)) => self.delete(displaced),
            (action, None) => {
                tracing::warn!(
                    "Placement '{}' for '{}' has no target",
                    action,
                    file.path.display()
                );
                Ok(())
            }
        };

        if outcome.is_err() {
            return;
        }

        match (action, target.as_deref()) {
            (
                PlacementAction::Move | PlacementAction::Replace | PlacementAction::RenameAndMove,
                Some(to),
            ) => {
                self.placed.insert(to.to_path_buf());
                self.plan(&file.path, Some((file, to)));
            }
            (PlacementAction::DeleteIncoming, _) => self.plan(&file.path, None),
            (PlacementAction::DeleteExisting, Some(displaced)) => self.plan(displaced, None),
            _ => {}
        }

        self.report.record(FileAction {
            path: file.path.clone(),
            action,
            target,
            tier: Some(tier),
        });
    }

    fn move_to(&mut self, file: &TrackedFile, to: &Path) -> Result<(), ()> {
        if self.dry_run {
            return Ok(());
        }
        let what = format!("move '{}' to '{}'", file.path.display(), to.display());
        let port = &mut *self.port;
        self.retry
            .run(&what, || port.move_file(&file.path, to))
            .map_err(|e| self.fail(&file.path, &e))
    }

    fn delete(&mut self, path: &Path) -> Result<(), ()> {
        if self.dry_run {
            return Ok(());
        }
        let what = format!("delete '{}'", path.display());
        let port = &mut *self.port;
        self.retry
            .run(&what, || port.delete_file(path))
            .map_err(|e| self.fail(path, &e))
    }

    fn fail(&mut self, path: &Path, error: &P::Error) {
        tracing::warn!("Failed to process '{}': {}", path.display(), error);
        self.report.record_failure(path, error.kind(), error.to_string());
    }

    fn dry_run_prefix(&self) -> &'static str {
        if self.dry_run {
            "DRY RUN: "
        } else {
            ""
        }
    }
}
