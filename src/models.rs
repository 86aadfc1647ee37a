// Core data structures for the recording scheduler

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Timestamp format used by the MEDIA-select guide (`202401151430`)
pub const GUIDE_TIME_FORMAT: &str = "%Y%m%d%H%M";

/// Furthest same-start disambiguation moves a start, in minutes
pub const MAX_START_SHIFT_MINUTES: i64 = 1;

/// A raw guide record exactly as stored in the guide JSON files
///
/// Records are kept untyped so that diffing against the last submitted guide
/// compares every field the upstream feed sends, not only the ones we use.
pub type GuideRecord = Value;

/// Reasons a guide record cannot be turned into a schedulable entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Record is not a JSON object
    #[error("record is not a JSON object")]
    NotAnObject,

    /// A required field is absent or null
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// `start` is not a `YYYYMMDDHHMM` string
    #[error("invalid start '{0}', expected YYYYMMDDHHMM")]
    InvalidStart(String),

    /// `duration` is not a non-negative integer number of seconds
    #[error("invalid duration '{0}', expected non-negative seconds")]
    InvalidDuration(String),
}

/// Parse a guide timestamp into a wall-clock date-time
pub fn parse_guide_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, GUIDE_TIME_FORMAT).ok()
}

fn field_start(record: &Value) -> Result<NaiveDateTime, RecordError> {
    match record.get("start") {
        None | Some(Value::Null) => Err(RecordError::MissingField("start")),
        Some(Value::String(raw)) => {
            parse_guide_time(raw).ok_or_else(|| RecordError::InvalidStart(raw.clone()))
        }
        Some(other) => Err(RecordError::InvalidStart(other.to_string())),
    }
}

fn field_duration(record: &Value) -> Result<Duration, RecordError> {
    match record.get("duration") {
        None | Some(Value::Null) => Err(RecordError::MissingField("duration")),
        Some(value) => value
            .as_i64()
            .filter(|secs| *secs >= 0)
            .and_then(Duration::try_seconds)
            .ok_or_else(|| RecordError::InvalidDuration(value.to_string())),
    }
}

/// End of a window starting at `start`, or `InvalidDuration` past the calendar
fn window_end(
    start: NaiveDateTime,
    duration: Duration,
    record: &Value,
) -> Result<NaiveDateTime, RecordError> {
    start
        .checked_add_signed(duration)
        .ok_or_else(|| RecordError::InvalidDuration(record["duration"].to_string()))
}

/// The `(start, end)` interval a recording occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RecordingWindow {
    /// Create a window from a start and a duration, `None` past the calendar
    pub fn new(start: NaiveDateTime, duration: Duration) -> Option<Self> {
        start
            .checked_add_signed(duration)
            .map(|end| Self { start, end })
    }

    /// Whether two windows share at least one instant (bounds inclusive)
    pub fn overlaps(&self, other: &RecordingWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A pending guide entry that may be booked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position in the pending list (zero-based)
    pub index: usize,

    /// Guide channel label, `None` when the record carries no channel
    pub channel: Option<String>,

    /// Program title as sent by the guide
    pub title: String,

    /// Raw start, before same-start disambiguation
    pub start: NaiveDateTime,

    pub duration: Duration,
}

impl Candidate {
    /// Build a candidate from a guide record
    pub fn from_record(index: usize, record: &GuideRecord) -> Result<Self, RecordError> {
        if !record.is_object() {
            return Err(RecordError::NotAnObject);
        }

        let start = field_start(record)?;
        let duration = field_duration(record)?;
        // The same-start rule may push the start back before the window is built
        let latest_start = start
            .checked_add_signed(Duration::minutes(MAX_START_SHIFT_MINUTES))
            .ok_or_else(|| RecordError::InvalidStart(record["start"].to_string()))?;
        window_end(latest_start, duration, record)?;

        let channel = record
            .get("channel")
            .and_then(Value::as_str)
            .map(str::to_string);

        let title = record
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            index,
            channel,
            title,
            start,
            duration,
        })
    }

    /// Window this candidate occupies when it starts at `start`
    pub fn window_at(&self, start: NaiveDateTime) -> Option<RecordingWindow> {
        RecordingWindow::new(start, self.duration)
    }
}

/// A recording booked by a previous run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedRecording {
    pub start: NaiveDateTime,
    pub duration: Duration,
    pub end: NaiveDateTime,
}

impl CommittedRecording {
    /// Build a committed recording from a record of the last submitted guide
    pub fn from_record(record: &GuideRecord) -> Result<Self, RecordError> {
        if !record.is_object() {
            return Err(RecordError::NotAnObject);
        }

        let start = field_start(record)?;
        let duration = field_duration(record)?;
        let end = window_end(start, duration, record)?;

        Ok(Self {
            start,
            duration,
            end,
        })
    }

    pub fn window(&self) -> RecordingWindow {
        RecordingWindow {
            start: self.start,
            end: self.end,
        }
    }
}
