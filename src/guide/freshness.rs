//! When to download the guide again
//!
//! The guide is refreshed at most once per day: only when nothing has been
//! submitted today, and only when the fetched copy is missing, empty or older
//! than the configured age. "Today" is the calendar date in the guide's time
//! zone.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// Modification time and size of a guide file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileState {
    pub modified: DateTime<Utc>,
    pub size: u64,
}

/// Decide whether the guide must be fetched
pub fn needs_refresh(
    now: DateTime<Tz>,
    last_submitted: Option<&FileState>,
    current: Option<&FileState>,
    max_age: Duration,
) -> bool {
    let tz = now.timezone();
    let submitted_today = last_submitted
        .is_some_and(|last| last.modified.with_timezone(&tz).date_naive() >= now.date_naive());
    if submitted_today {
        return false;
    }

    match current {
        None => true,
        Some(state) => state.size == 0 || now.signed_duration_since(state.modified) > max_age,
    }
}
