//! Plan building from the stored guide files

use chrono::NaiveDate;

use crate::channels::ChannelTable;
use crate::config::Config;
use crate::error::Result;
use crate::guide::GuideStore;
use crate::scheduler::{BookingPlan, PassConfig, SchedulingPass};

/// Result of a planning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// No pending entry or empty guide; the current guide was promoted
    NothingToRecord,
    /// Decisions to hand to the booking driver
    Planned(BookingPlan),
}

/// Build the booking plan with the configured pass settings
pub async fn build_plan(config: &Config, store: &GuideStore, today: NaiveDate) -> Result<PlanOutcome> {
    build_plan_with(config, config.pass_config(), store, today).await
}

/// Build the booking plan with explicit pass settings
///
/// Everything is loaded and validated before the pass starts, so a bad file
/// never yields a partial plan.
pub async fn build_plan_with(
    config: &Config,
    pass_config: PassConfig,
    store: &GuideStore,
    today: NaiveDate,
) -> Result<PlanOutcome> {
    let channels = ChannelTable::load(config.storage.channels_file.as_deref())?;
    let current = store.load_current().await?;
    let pending = store.load_pending().await?;

    if pending.is_empty() || current.is_empty() {
        store.promote().await?;
        tracing::info!("No programmes to record");
        return Ok(PlanOutcome::NothingToRecord);
    }

    let committed = store.load_last().await?;
    let pass = SchedulingPass::new(&channels, pass_config, today);
    let plan = pass.run(&pending, &committed)?;

    Ok(PlanOutcome::Planned(plan))
}
