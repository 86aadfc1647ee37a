//! One scheduling pass over the pending guide entries
//!
//! The pass validates both input lists up front, then walks the candidates in
//! input order: same-start disambiguation, channel lookup, admission. Every
//! candidate gets exactly one decision, and the decision stream depends only
//! on the inputs.

use chrono::NaiveDate;

use super::admission::{build_policy, peak_concurrency, PolicyKind, WindowLedger};
use super::day_label::DayLabel;
use super::disambiguate::StartDisambiguator;
use super::error::{SchedulerError, SchedulerResult};
use super::plan::{Booking, BookingPlan, Decision, PlanSummary, RejectReason, Rejection};
use crate::channels::ChannelTable;
use crate::models::{Candidate, CommittedRecording, GuideRecord, RecordError, GUIDE_TIME_FORMAT};
use crate::utils::sanitize_title;

/// Parse every pending record, failing on the first malformed one
pub fn parse_candidates(records: &[GuideRecord]) -> SchedulerResult<Vec<Candidate>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Candidate::from_record(index, record)
                .map_err(|e| SchedulerError::malformed_candidate(index, e))
        })
        .collect()
}

/// Parse every record of the last submitted guide
pub fn parse_committed(records: &[GuideRecord]) -> SchedulerResult<Vec<CommittedRecording>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            CommittedRecording::from_record(record)
                .map_err(|e| SchedulerError::malformed_committed(index, e))
        })
        .collect()
}

/// Settings of a scheduling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassConfig {
    /// Simultaneous recording streams
    pub capacity: usize,

    pub policy: PolicyKind,

    /// Name recordings after the guide title
    pub use_guide_titles: bool,
}

impl PassConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: PolicyKind::default(),
            use_guide_titles: true,
        }
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_guide_titles(mut self, enabled: bool) -> Self {
        self.use_guide_titles = enabled;
        self
    }
}

/// Admission scheduler for one run
pub struct SchedulingPass<'a> {
    channels: &'a ChannelTable,
    config: PassConfig,
    today: NaiveDate,
}

impl<'a> SchedulingPass<'a> {
    pub fn new(channels: &'a ChannelTable, config: PassConfig, today: NaiveDate) -> Self {
        Self {
            channels,
            config,
            today,
        }
    }

    /// Decide on raw guide records
    ///
    /// Malformed records or an invalid capacity abort before any decision.
    pub fn run(
        &self,
        pending: &[GuideRecord],
        committed: &[GuideRecord],
    ) -> SchedulerResult<BookingPlan> {
        let candidates = parse_candidates(pending)?;
        let committed = parse_committed(committed)?;
        self.schedule(&candidates, &committed)
    }

    /// Decide on parsed candidates
    pub fn schedule(
        &self,
        candidates: &[Candidate],
        committed: &[CommittedRecording],
    ) -> SchedulerResult<BookingPlan> {
        let ledger = WindowLedger::seeded(
            self.config.capacity,
            committed.iter().map(CommittedRecording::window),
        )?;
        let mut policy = build_policy(self.config.policy, ledger);
        let mut starts = StartDisambiguator::new();

        let mut summary = PlanSummary {
            candidates: candidates.len(),
            committed: committed.len(),
            ..PlanSummary::default()
        };
        let mut decisions = Vec::with_capacity(candidates.len());

        tracing::debug!(
            candidates = candidates.len(),
            committed = committed.len(),
            capacity = self.config.capacity,
            policy = %self.config.policy,
            "Starting scheduling pass"
        );

        for candidate in candidates {
            let start = starts.effective_start(candidate.start).ok_or_else(|| {
                SchedulerError::malformed_candidate(
                    candidate.index,
                    RecordError::InvalidStart(candidate.start.format(GUIDE_TIME_FORMAT).to_string()),
                )
            })?;
            if start != candidate.start {
                tracing::debug!(
                    index = candidate.index,
                    raw = %candidate.start,
                    effective = %start,
                    "Shifted duplicate start"
                );
            }

            let number = candidate
                .channel
                .as_deref()
                .and_then(|label| self.channels.resolve(label));

            let (Some(label), Some(number)) = (candidate.channel.as_deref(), number) else {
                tracing::warn!(
                    index = candidate.index,
                    channel = candidate.channel.as_deref().unwrap_or_default(),
                    "Channel missing from the channel table, skipping"
                );
                summary.channel_not_found += 1;
                decisions.push(self.reject(candidate, start, RejectReason::ChannelNotFound));
                continue;
            };

            let window = candidate.window_at(start).ok_or_else(|| {
                SchedulerError::malformed_candidate(
                    candidate.index,
                    RecordError::InvalidDuration(candidate.duration.num_seconds().to_string()),
                )
            })?;
            if !policy.admit(window)? {
                tracing::info!(
                    index = candidate.index,
                    channel = label,
                    start = %start,
                    "Capacity exceeded, not recording"
                );
                summary.capacity_exceeded += 1;
                decisions.push(self.reject(candidate, start, RejectReason::CapacityExceeded));
                continue;
            }

            summary.admitted += 1;
            decisions.push(Decision::Admit(Booking {
                index: candidate.index,
                channel: label.to_string(),
                channel_number: number.to_string(),
                title: self
                    .config
                    .use_guide_titles
                    .then(|| sanitize_title(&candidate.title)),
                start: window.start,
                end: window.end,
                day_label: DayLabel::resolve(window.start.date(), self.today),
                start_time: window.start.format("%H:%M").to_string(),
                end_time: window.end.format("%H:%M").to_string(),
            }));
        }

        summary.peak_concurrency = peak_concurrency(policy.ledger().windows());
        if summary.peak_concurrency > self.config.capacity {
            tracing::warn!(
                peak = summary.peak_concurrency,
                capacity = self.config.capacity,
                policy = %self.config.policy,
                "Booked windows exceed capacity; the last submitted guide already over-commits the box"
            );
        }

        tracing::info!(
            admitted = summary.admitted,
            channel_not_found = summary.channel_not_found,
            capacity_exceeded = summary.capacity_exceeded,
            "Scheduling pass complete"
        );

        Ok(BookingPlan {
            today: self.today,
            policy: self.config.policy,
            capacity: self.config.capacity,
            decisions,
            summary,
        })
    }

    fn reject(
        &self,
        candidate: &Candidate,
        start: chrono::NaiveDateTime,
        reason: RejectReason,
    ) -> Decision {
        Decision::Reject(Rejection {
            index: candidate.index,
            channel: candidate.channel.clone(),
            title: sanitize_title(&candidate.title),
            start,
            reason,
        })
    }
}
