//! Common test utilities

use chrono::{NaiveDate, NaiveDateTime};
use freebox_select::channels::ChannelTable;
use freebox_select::models::{parse_guide_time, GuideRecord};
use serde_json::json;

/// Reference date of the fixtures
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

/// Guide timestamp on the reference date, `hhmm`
pub fn at(hhmm: &str) -> NaiveDateTime {
    parse_guide_time(&format!("20240115{hhmm}")).unwrap()
}

/// Channel table with a few TNT channels
pub fn channels() -> ChannelTable {
    [("TF1", "1"), ("France 2", "2"), ("France 3", "3"), ("Arte", "7")]
        .into_iter()
        .collect()
}

/// Pending guide entry on the reference date
pub fn prog(channel: &str, hhmm: &str, duration_secs: i64) -> GuideRecord {
    json!({
        "channel": channel,
        "title": format!("Programme {channel} {hhmm}"),
        "start": format!("20240115{hhmm}"),
        "duration": duration_secs,
    })
}

/// Entry of the last submitted guide on the reference date
#[allow(dead_code)]
pub fn committed(hhmm: &str, duration_secs: i64) -> GuideRecord {
    json!({
        "channel": "TF1",
        "title": "Déjà programmé",
        "start": format!("20240115{hhmm}"),
        "duration": duration_secs,
    })
}

/// Pending entry at an arbitrary minute offset from midnight of the reference date
#[allow(dead_code)]
pub fn prog_at_minute(channel: &str, minute: i64, duration_secs: i64) -> GuideRecord {
    let start = today().and_hms_opt(0, 0, 0).unwrap() + chrono::Duration::minutes(minute);
    json!({
        "channel": channel,
        "title": "Programme",
        "start": start.format("%Y%m%d%H%M").to_string(),
        "duration": duration_secs,
    })
}
