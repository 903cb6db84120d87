//! Tier classification
//!
//! Maps a file's modification time and the run's reference time to a [`TierOutcome`].
//! Rules are evaluated in priority order; the first match wins:
//!
//! 1. **Future**: `mtime > reference`
//! 2. **Yearly**: mtime falls on December 31st
//! 3. **Monthly**: mtime falls on the 25th of any month
//! 4. **Daily**: mtime falls on the reference's UTC calendar day
//! 5. **Weekly**: `reference - mtime <= 7 days`
//! 6. **Expired**: anything else
//!
//! All comparisons are done in UTC so daylight-saving transitions never flip a tier.

use crate::tier::{Tier, TierOutcome};
use chrono::{DateTime, Datelike, Duration, Utc};

/// Widest age (inclusive) a file can have and still be kept in the Weekly tier
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Day of month that anchors the Monthly tier
pub const MONTHLY_ANCHOR_DAY: u32 = 25;

/// Classify a file by modification time against the reference time of the run
///
/// Total and pure: every `(mtime, reference)` pair maps to exactly one outcome.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tiersort_domain::{classify, Tier, TierOutcome};
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 12, 10, 0, 0).unwrap();
/// let three_days_ago = Utc.with_ymd_and_hms(2024, 6, 9, 10, 0, 0).unwrap();
///
/// assert_eq!(classify(three_days_ago, now), TierOutcome::Keep(Tier::Weekly));
/// ```
pub fn classify(mtime: DateTime<Utc>, reference: DateTime<Utc>) -> TierOutcome {
    if mtime > reference {
        return TierOutcome::Keep(Tier::Future);
    }

    if mtime.month() == 12 && mtime.day() == 31 {
        return TierOutcome::Keep(Tier::Yearly);
    }

    if mtime.day() == MONTHLY_ANCHOR_DAY {
        return TierOutcome::Keep(Tier::Monthly);
    }

    if mtime.date_naive() == reference.date_naive() {
        return TierOutcome::Keep(Tier::Daily);
    }

    // mtime <= reference here and the calendar days differ, so the age is positive
    if reference - mtime <= Duration::days(WEEKLY_WINDOW_DAYS) {
        return TierOutcome::Keep(Tier::Weekly);
    }

    TierOutcome::Expired
}
