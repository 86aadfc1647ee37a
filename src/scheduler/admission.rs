//! Capacity-bounded admission of recording windows
//!
//! Two policies share the [`AdmissionPolicy`] seam:
//!
//! - [`LookbackPolicy`] keeps the historical rule: once the ledger holds
//!   `capacity` windows, a new window is admitted only if it starts strictly
//!   after the end of the window `capacity` positions back in append order.
//!   Windows `capacity` positions apart never overlap, so the rule holds the
//!   capacity in any order, but it rejects windows that arrive after a later
//!   one even when the box is idle then.
//! - [`IntervalPolicy`] admits a window only if the number of held windows
//!   simultaneously open at any instant of it stays below capacity.
//!
//! Window bounds are inclusive on both policies: a window starting exactly
//! when another ends overlaps it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use super::error::{SchedulerError, SchedulerResult};
use crate::models::RecordingWindow;

// ============================================================================
// Policy Kind
// ============================================================================

/// Selectable admission policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Append-order look-back rule
    #[default]
    Legacy,
    /// Peak-overlap interval admission
    Interval,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Interval => "interval",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" | "lookback" => Ok(Self::Legacy),
            "interval" => Ok(Self::Interval),
            _ => Err(SchedulerError::UnknownPolicy {
                name: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Window Ledger
// ============================================================================

/// Ordered sequence of occupied windows, in append order
#[derive(Debug, Clone)]
pub struct WindowLedger {
    windows: Vec<RecordingWindow>,
    capacity: usize,
}

impl WindowLedger {
    /// Create a ledger seeded with already committed windows
    pub fn seeded(
        capacity: usize,
        committed: impl IntoIterator<Item = RecordingWindow>,
    ) -> SchedulerResult<Self> {
        if capacity == 0 {
            return Err(SchedulerError::InvalidCapacity { capacity });
        }

        Ok(Self {
            windows: committed.into_iter().collect(),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of windows held
    pub fn held(&self) -> usize {
        self.windows.len()
    }

    pub fn windows(&self) -> &[RecordingWindow] {
        &self.windows
    }

    pub fn push(&mut self, window: RecordingWindow) {
        self.windows.push(window);
    }

    /// End of the window `capacity` positions back from the end
    pub fn lookback_end(&self) -> SchedulerResult<NaiveDateTime> {
        let held = self.windows.len();
        held.checked_sub(self.capacity)
            .map(|idx| self.windows[idx].end)
            .ok_or(SchedulerError::LookbackUnderflow {
                held,
                capacity: self.capacity,
            })
    }

    /// Highest number of held windows open together during `window`
    pub fn peak_overlap(&self, window: &RecordingWindow) -> usize {
        // Windows are closed intervals. If k of the overlapping windows share
        // an instant, those k and `window` pairwise intersect, so all k + 1
        // share an instant (Helly property on the line). That instant lies
        // inside `window`, so the peak over this subset is the peak within
        // `window` even when the sweep finds it elsewhere.
        let overlapping: Vec<RecordingWindow> = self
            .windows
            .iter()
            .filter(|w| w.overlaps(window))
            .copied()
            .collect();
        peak_concurrency(&overlapping)
    }
}

/// Highest number of windows open at the same instant
///
/// Sweeps windows by start time while a min-heap tracks the ends of the
/// windows still open.
pub fn peak_concurrency(windows: &[RecordingWindow]) -> usize {
    let mut sorted = windows.to_vec();
    sorted.sort_by_key(|w| (w.start, w.end));

    let mut open: BinaryHeap<Reverse<NaiveDateTime>> = BinaryHeap::new();
    let mut peak = 0;

    for window in sorted {
        while open.peek().is_some_and(|Reverse(end)| *end < window.start) {
            open.pop();
        }
        open.push(Reverse(window.end));
        peak = peak.max(open.len());
    }

    peak
}

/// Look-back admission test on a ledger
///
/// Admits and appends `window` when fewer than `capacity` windows are held,
/// or when it starts strictly after the end of the window `capacity`
/// positions back. A rejected window leaves the ledger untouched.
pub fn admit_lookback(ledger: &mut WindowLedger, window: RecordingWindow) -> SchedulerResult<bool> {
    if ledger.held() < ledger.capacity() {
        ledger.push(window);
        return Ok(true);
    }

    if window.start > ledger.lookback_end()? {
        ledger.push(window);
        Ok(true)
    } else {
        Ok(false)
    }
}

// ============================================================================
// Policies
// ============================================================================

/// Admission decision strategy over a window ledger
pub trait AdmissionPolicy: Send {
    fn kind(&self) -> PolicyKind;

    fn ledger(&self) -> &WindowLedger;

    /// Decide on `window`, appending it to the ledger when admitted
    fn admit(&mut self, window: RecordingWindow) -> SchedulerResult<bool>;
}

/// Append-order look-back policy
#[derive(Debug, Clone)]
pub struct LookbackPolicy {
    ledger: WindowLedger,
}

impl LookbackPolicy {
    pub fn new(ledger: WindowLedger) -> Self {
        Self { ledger }
    }
}

impl AdmissionPolicy for LookbackPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Legacy
    }

    fn ledger(&self) -> &WindowLedger {
        &self.ledger
    }

    fn admit(&mut self, window: RecordingWindow) -> SchedulerResult<bool> {
        admit_lookback(&mut self.ledger, window)
    }
}

/// Peak-overlap interval policy
#[derive(Debug, Clone)]
pub struct IntervalPolicy {
    ledger: WindowLedger,
}

impl IntervalPolicy {
    pub fn new(ledger: WindowLedger) -> Self {
        Self { ledger }
    }
}

impl AdmissionPolicy for IntervalPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Interval
    }

    fn ledger(&self) -> &WindowLedger {
        &self.ledger
    }

    fn admit(&mut self, window: RecordingWindow) -> SchedulerResult<bool> {
        if self.ledger.peak_overlap(&window) < self.ledger.capacity() {
            self.ledger.push(window);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Build the policy selected by `kind` over a seeded ledger
pub fn build_policy(kind: PolicyKind, ledger: WindowLedger) -> Box<dyn AdmissionPolicy> {
    match kind {
        PolicyKind::Legacy => Box::new(LookbackPolicy::new(ledger)),
        PolicyKind::Interval => Box::new(IntervalPolicy::new(ledger)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn window(hour: u32, minute: u32, secs: i64) -> RecordingWindow {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        RecordingWindow::new(start, Duration::seconds(secs)).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = WindowLedger::seeded(0, Vec::new()).unwrap_err();
        assert_eq!(err, SchedulerError::InvalidCapacity { capacity: 0 });
    }

    #[test]
    fn test_lookback_end_underflow() {
        let ledger = WindowLedger::seeded(2, vec![window(10, 0, 3600)]).unwrap();
        assert_eq!(
            ledger.lookback_end(),
            Err(SchedulerError::LookbackUnderflow {
                held: 1,
                capacity: 2
            })
        );
    }

    #[test]
    fn test_lookback_end_uses_append_order() {
        // Appended out of time order on purpose
        let ledger = WindowLedger::seeded(
            2,
            vec![window(18, 0, 3600), window(9, 0, 3600), window(10, 0, 3600)],
        )
        .unwrap();
        assert_eq!(ledger.lookback_end().unwrap(), window(9, 0, 3600).end);
    }

    #[test]
    fn test_admit_lookback_fills_free_slots() {
        let mut ledger = WindowLedger::seeded(2, Vec::new()).unwrap();
        assert!(admit_lookback(&mut ledger, window(10, 0, 3600)).unwrap());
        assert!(admit_lookback(&mut ledger, window(10, 30, 3600)).unwrap());
        assert_eq!(ledger.held(), 2);
    }

    #[test]
    fn test_admit_lookback_requires_strictly_after() {
        let mut ledger = WindowLedger::seeded(1, vec![window(9, 0, 3600)]).unwrap();

        assert!(!admit_lookback(&mut ledger, window(10, 0, 1800)).unwrap());
        assert_eq!(ledger.held(), 1);

        assert!(admit_lookback(&mut ledger, window(10, 1, 1800)).unwrap());
        assert_eq!(ledger.held(), 2);
    }

    #[test]
    fn test_peak_concurrency() {
        assert_eq!(peak_concurrency(&[]), 0);

        let windows = [
            window(10, 0, 3600),
            window(10, 30, 3600),
            window(10, 45, 600),
            window(12, 0, 600),
        ];
        assert_eq!(peak_concurrency(&windows), 3);

        // Touching bounds count as overlapping
        let touching = [window(9, 0, 3600), window(10, 0, 3600)];
        assert_eq!(peak_concurrency(&touching), 2);
    }

    #[test]
    fn test_interval_policy_ignores_append_order() {
        let ledger = WindowLedger::seeded(1, vec![window(20, 0, 3600)]).unwrap();
        let mut policy = IntervalPolicy::new(ledger);

        // Earlier in the day and disjoint: admitted regardless of order
        assert!(policy.admit(window(8, 0, 3600)).unwrap());
        // Overlaps the committed evening window
        assert!(!policy.admit(window(20, 30, 600)).unwrap());
        assert_eq!(policy.ledger().held(), 2);
    }

    #[test]
    fn test_interval_policy_counts_peak_not_total() {
        let ledger =
            WindowLedger::seeded(2, vec![window(10, 0, 1800), window(11, 0, 1800)]).unwrap();
        let mut policy = IntervalPolicy::new(ledger);

        // Spans both, but they are never open together
        assert!(policy.admit(window(9, 45, 7200)).unwrap());
        // Now 10:00-10:30 is doubly booked
        assert!(!policy.admit(window(10, 15, 600)).unwrap());
    }

    #[test]
    fn test_policy_kind_parsing() {
        assert_eq!("legacy".parse::<PolicyKind>().unwrap(), PolicyKind::Legacy);
        assert_eq!("Interval".parse::<PolicyKind>().unwrap(), PolicyKind::Interval);
        assert!("greedy".parse::<PolicyKind>().is_err());
        assert_eq!(PolicyKind::default(), PolicyKind::Legacy);
    }

    #[test]
    fn test_build_policy_kind() {
        let ledger = WindowLedger::seeded(1, Vec::new()).unwrap();
        assert_eq!(build_policy(PolicyKind::Legacy, ledger.clone()).kind(), PolicyKind::Legacy);
        assert_eq!(build_policy(PolicyKind::Interval, ledger).kind(), PolicyKind::Interval);
    }
}
