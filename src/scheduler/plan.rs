//! Booking plan data structures
//!
//! A booking plan is the ordered decision stream of one scheduling pass, as
//! handed to the booking driver.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::admission::PolicyKind;
use super::day_label::DayLabel;
use super::error::{SchedulerError, SchedulerResult};

// ============================================================================
// Decisions
// ============================================================================

/// Why a candidate will not be booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Channel label absent from the channel table
    ChannelNotFound,
    /// Admission test failed
    CapacityExceeded,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelNotFound => f.write_str("channel not found"),
            Self::CapacityExceeded => f.write_str("capacity exceeded"),
        }
    }
}

/// An admitted candidate, with everything the booking form needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Position in the pending list
    pub index: usize,

    /// Guide channel label
    pub channel: String,

    /// Freebox channel number
    pub channel_number: String,

    /// Sanitized title, when guide titles are used to name recordings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Start after same-start disambiguation
    pub start: NaiveDateTime,

    pub end: NaiveDateTime,

    /// Date-picker entry
    pub day_label: DayLabel,

    /// `HH:MM` typed in the start field
    pub start_time: String,

    /// `HH:MM` typed in the end field
    pub end_time: String,
}

impl Booking {
    /// Date-picker text the booking driver looks for
    pub fn day_text(&self) -> String {
        self.day_label.ui_text()
    }
}

/// A candidate that will not be booked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    pub title: String,

    /// Start after same-start disambiguation
    pub start: NaiveDateTime,

    pub reason: RejectReason,
}

/// Outcome for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Admit(Booking),
    Reject(Rejection),
}

impl Decision {
    pub fn index(&self) -> usize {
        match self {
            Self::Admit(b) => b.index,
            Self::Reject(r) => r.index,
        }
    }

    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit(_))
    }

    /// Effective start of the candidate
    pub fn start(&self) -> NaiveDateTime {
        match self {
            Self::Admit(b) => b.start,
            Self::Reject(r) => r.start,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Admit(_) => None,
            Self::Reject(r) => Some(r.reason),
        }
    }
}

// ============================================================================
// Booking Plan
// ============================================================================

/// Counters of a scheduling pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Pending candidates examined
    pub candidates: usize,

    /// Windows seeded from the last submitted guide
    pub committed: usize,

    pub admitted: usize,

    pub channel_not_found: usize,

    pub capacity_exceeded: usize,

    /// Highest number of windows open together after the pass
    pub peak_concurrency: usize,
}

impl PlanSummary {
    pub fn rejected(&self) -> usize {
        self.channel_not_found + self.capacity_exceeded
    }

    /// Format as display string
    pub fn display(&self) -> String {
        let mut output = String::from("Scheduling Summary\n");
        output.push_str(&format!("{:-<40}\n", ""));
        output.push_str(&format!("Candidates:         {}\n", self.candidates));
        output.push_str(&format!("Committed windows:  {}\n", self.committed));
        output.push_str(&format!("Admitted:           {}\n", self.admitted));
        output.push_str(&format!("Channel not found:  {}\n", self.channel_not_found));
        output.push_str(&format!("Capacity exceeded:  {}\n", self.capacity_exceeded));
        output.push_str(&format!("Peak concurrency:   {}\n", self.peak_concurrency));
        output
    }
}

/// Ordered decisions of one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPlan {
    /// Reference date used for day labels
    pub today: NaiveDate,

    pub policy: PolicyKind,

    pub capacity: usize,

    /// One decision per candidate, in input order
    pub decisions: Vec<Decision>,

    pub summary: PlanSummary,
}

impl BookingPlan {
    /// Admitted bookings, in the order they must be performed
    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.decisions.iter().filter_map(|d| match d {
            Decision::Admit(b) => Some(b),
            Decision::Reject(_) => None,
        })
    }

    pub fn rejections(&self) -> impl Iterator<Item = &Rejection> {
        self.decisions.iter().filter_map(|d| match d {
            Decision::Admit(_) => None,
            Decision::Reject(r) => Some(r),
        })
    }

    /// Peak concurrency of committed and admitted windows above capacity
    pub fn is_overbooked(&self) -> bool {
        self.summary.peak_concurrency > self.capacity
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SchedulerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SchedulerError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> SchedulerResult<Self> {
        serde_json::from_str(json).map_err(|e| SchedulerError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Save to file
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> SchedulerResult<()> {
        let json = self.to_json()?;
        tokio::fs::write(path.as_ref(), json)
            .await
            .map_err(|e| SchedulerError::io_error("save_plan", e.to_string()))
    }

    /// Load from file
    pub async fn load_from_file(path: impl AsRef<Path>) -> SchedulerResult<Self> {
        let json = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| SchedulerError::io_error("load_plan", e.to_string()))?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Tests
// ============================================================================
