//! Pending entries: fetched guide minus what was already submitted

use serde_json::Value;
use std::collections::HashSet;

use crate::models::GuideRecord;

/// Records of `current` that are not in `last`, in `current` order
///
/// Records are compared whole, so an entry whose time or title changed
/// upstream is pending again.
pub fn pending(current: &[GuideRecord], last: &[GuideRecord]) -> Vec<GuideRecord> {
    let submitted: HashSet<String> = last.iter().map(canonical).collect();

    current
        .iter()
        .filter(|record| !submitted.contains(&canonical(record)))
        .cloned()
        .collect()
}

/// Key-order independent serialization of a record
fn canonical(record: &GuideRecord) -> String {
    match record {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let fields: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| format!("{:?}:{}", key, canonical(value)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}
