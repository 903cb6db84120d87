//! Tier module - retention buckets for backup files

use std::fmt;

/// Retention tier a backup file is sorted into
///
/// Each tier owns a fixed folder directly under the backup root:
/// - Future: mtime lies ahead of the run's reference time (quarantine)
/// - Yearly: taken on December 31st
/// - Monthly: taken on the 25th of any month
/// - Daily: taken on the same UTC day as the run
/// - Weekly: taken within the last seven days
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Files dated after the reference time
    Future,

    /// December 31st snapshots
    Yearly,

    /// Snapshots from the 25th of a month
    Monthly,

    /// Snapshots from the current day
    Daily,

    /// Snapshots from the last seven days
    Weekly,
}

impl Tier {
    /// Every tier, in classification priority order
    pub const ALL: [Tier; 5] = [
        Tier::Future,
        Tier::Yearly,
        Tier::Monthly,
        Tier::Daily,
        Tier::Weekly,
    ];

    /// Tiers whose membership can change as time advances and must be rechecked every run
    pub const TIME_SENSITIVE: [Tier; 3] = [Tier::Future, Tier::Daily, Tier::Weekly];

    /// Name of the folder under the backup root that holds this tier
    pub fn folder_name(&self) -> &'static str {
        match self {
            Tier::Future => "_FutureFiles",
            Tier::Yearly => "Yearly",
            Tier::Monthly => "Monthly",
            Tier::Daily => "Daily",
            Tier::Weekly => "Weekly",
        }
    }

    /// Map a folder name back to its tier (exact match)
    pub fn from_folder_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.folder_name() == name)
    }

    /// Whether `name` is one of the reserved tier folder names
    pub fn is_reserved_name(name: &str) -> bool {
        Self::from_folder_name(name).is_some()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Result of classifying a file: keep it in a tier, or delete it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierOutcome {
    /// File belongs in the given tier
    Keep(Tier),

    /// File matches no retention rule and must be deleted
    Expired,
}
