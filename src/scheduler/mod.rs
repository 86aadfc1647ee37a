//! Overlap-aware recording scheduler
//!
//! This module decides which pending guide entries can be recorded without
//! exceeding the number of simultaneous recording streams of the box, and in
//! which order the booking driver must book them.
//!
//! # Overview
//!
//! A pass is greedy, single-threaded and fully deterministic. The window
//! ledger is seeded with the recordings committed by the previous run, then
//! each candidate is processed in input order:
//!
//! ```text
//!   pending entries ──► same-start ──► channel ──► admission ──► Decision
//!   (input order)       shift (+1m)    lookup      policy        stream
//!                                         │            │
//!                                         ▼            ▼
//!                                 ChannelNotFound  CapacityExceeded
//! ```
//!
//! # Modules
//!
//! - [`admission`] - Window ledger and admission policies
//! - [`disambiguate`] - Same-start shift accumulator
//! - [`day_label`] - Date-picker labels of the booking form
//! - [`pass`] - The scheduling pass itself
//! - [`plan`] - Decisions and booking plan persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use freebox_select::channels::ChannelTable;
//! use freebox_select::scheduler::{PassConfig, SchedulingPass};
//!
//! let channels = ChannelTable::builtin();
//! let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let pass = SchedulingPass::new(&channels, PassConfig::new(2), today);
//!
//! let plan = pass.run(&pending, &last_submitted)?;
//! for booking in plan.bookings() {
//!     println!("{} {} {}-{}", booking.channel_number, booking.day_text(),
//!              booking.start_time, booking.end_time);
//! }
//! ```
//!
//! # Policies
//!
//! | Policy | Rule |
//! |--------|------|
//! | `legacy` | start strictly after the end of the window `capacity` positions back in append order |
//! | `interval` | peak overlap with held windows below `capacity` |
//!
//! `legacy` is the default. It only compares against one past window, so an
//! early entry listed after later ones is rejected even when it fits; use
//! `interval` for guides that are not in chronological order. The pass logs a
//! warning when the committed windows alone already exceed capacity.

pub mod admission;
pub mod day_label;
pub mod disambiguate;
pub mod error;
pub mod pass;
pub mod plan;

// Re-export main types
pub use admission::{
    admit_lookback, build_policy, peak_concurrency, AdmissionPolicy, IntervalPolicy,
    LookbackPolicy, PolicyKind, WindowLedger,
};
pub use day_label::{month_name_fr, DayLabel, MONTH_NAMES_FR};
pub use disambiguate::{disambiguate_starts, StartDisambiguator};
pub use error::{SchedulerError, SchedulerResult};
pub use pass::{parse_candidates, parse_committed, PassConfig, SchedulingPass};
pub use plan::{Booking, BookingPlan, Decision, PlanSummary, RejectReason, Rejection};
