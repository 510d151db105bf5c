//! Local-day boundary helper
//!
//! Daily quotas and "activated today" windows are measured from midnight
//! in the server's local timezone, matching the dashboard the operators
//! look at.

use chrono::{DateTime, Local, TimeZone, Utc};

/// Start of the current local day, in UTC
pub fn local_day_start() -> DateTime<Utc> {
    let today = Local::now().date_naive();
    let midnight = today.and_hms_opt(0, 0, 0).unwrap_or_default();
    match Local.from_local_datetime(&midnight) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // DST gap/overlap at midnight: fall back to the earliest candidate
        chrono::LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        chrono::LocalResult::None => Utc::now(),
    }
}
