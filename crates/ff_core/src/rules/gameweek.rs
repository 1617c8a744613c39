//! Gameweek boundary helpers.
//!
//! A gameweek runs Sunday 00:00 UTC to Saturday 23:59 UTC; the lineup
//! deadline is Sunday 12:00 UTC. Free-transfer allowances and confirmed squad
//! snapshots are conceptually anchored to these boundaries; the engine itself
//! only exposes the pure time arithmetic.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};

/// Lineup deadline hour within the week-start day, UTC.
pub const LINEUP_DEADLINE_HOUR: u32 = 12;

/// Start of the gameweek containing `now` (most recent Sunday 00:00 UTC).
pub fn gameweek_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_sunday = now.weekday().num_days_from_sunday() as i64;
    let date = (now - Duration::days(days_since_sunday)).date_naive();
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
}

/// The lineup deadline of the gameweek containing `now` (Sunday 12:00 UTC).
pub fn gameweek_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    gameweek_start(now) + Duration::hours(LINEUP_DEADLINE_HOUR as i64)
}

/// The next lineup deadline strictly after `now`.
pub fn next_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    let deadline = gameweek_deadline(now);
    if now < deadline {
        deadline
    } else {
        deadline + Duration::weeks(1)
    }
}

/// True once the current gameweek's deadline has passed: lineup changes are
/// locked until the next gameweek starts.
pub fn is_lineup_locked(now: DateTime<Utc>) -> bool {
    now >= gameweek_deadline(now)
}

/// Sanity helper for display code.
pub fn is_week_start_day(now: DateTime<Utc>) -> bool {
    now.weekday() == Weekday::Sun
}
