//! freebox-select - Freebox recording scheduler for MEDIA-select guides
//!
//! Decides which program-guide entries a Freebox can record without exceeding
//! its number of simultaneous recording streams, and produces the ordered
//! booking plan a browser-automation driver executes.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`guide`] - Guide download, storage and diffing
//! - [`channels`] - Guide label to channel number lookup
//! - [`scheduler`] - Overlap-aware admission and booking plans
//! - [`pipeline`] - Plan building from the stored guide files
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use freebox_select::config::Config;
//! use freebox_select::guide::GuideStore;
//! use freebox_select::pipeline::{build_plan, PlanOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = GuideStore::new(&config.storage.data_dir);
//!     let today = config.today()?;
//!     if let PlanOutcome::Planned(plan) = build_plan(&config, &store, today).await? {
//!         println!("{}", plan.summary.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod channels;
pub mod config;
pub mod error;
pub mod guide;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::channels::ChannelTable;
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result, SelectErrorTrait};
    pub use crate::guide::{GuideClient, GuideStore};
    pub use crate::models::{Candidate, CommittedRecording, GuideRecord, RecordingWindow};
    pub use crate::scheduler::{BookingPlan, Decision, PassConfig, PolicyKind, SchedulingPass};
}

// Direct re-exports for convenience
pub use models::{Candidate, CommittedRecording, GuideRecord, RecordingWindow};
