use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use freebox_select::config::Config;
use freebox_select::error::Error;
use freebox_select::guide::{GuideStore, RefreshOutcome};
use freebox_select::pipeline::{build_plan_with, PlanOutcome};
use freebox_select::scheduler::{BookingPlan, Decision, PolicyKind};

pub async fn plan(
    config: &Config,
    today: Option<NaiveDate>,
    policy: Option<PolicyKind>,
    output: Option<PathBuf>,
) -> Result<()> {
    let store = GuideStore::new(&config.storage.data_dir);
    let today = match today {
        Some(today) => today,
        None => config.today()?,
    };

    let mut pass_config = config.pass_config();
    if let Some(policy) = policy {
        pass_config = pass_config.with_policy(policy);
    }

    tracing::info!(
        today = %today,
        timezone = %config.scheduler.timezone,
        policy = %pass_config.policy,
        capacity = pass_config.capacity,
        "Planning recordings"
    );

    let outcome = build_plan_with(config, pass_config, &store, today).await?;
    let plan = match outcome {
        PlanOutcome::NothingToRecord => {
            println!("Nothing to record");
            return Ok(());
        }
        PlanOutcome::Planned(plan) => plan,
    };

    match output {
        Some(path) => {
            plan.save_to_file(&path)
                .await
                .map_err(Error::from)
                .with_context(|| format!("Failed to write plan to {}", path.display()))?;
            print_plan(&plan);
            println!("\nPlan written to {}", path.display());
        }
        None => {
            let json = plan.to_json().map_err(Error::from)?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Fetch when stale, then plan into the data directory
pub async fn run(config: &Config, today: Option<NaiveDate>) -> Result<()> {
    let outcome = super::guide::fetch(config, false).await?;
    if outcome == RefreshOutcome::UpToDate {
        return Ok(());
    }

    let store = GuideStore::new(&config.storage.data_dir);
    let output = store.plan_path();
    println!();
    plan(config, today, None, Some(output)).await
}

fn print_plan(plan: &BookingPlan) {
    println!("Booking plan ({} policy, capacity {})", plan.policy, plan.capacity);
    println!("================================================");

    for decision in &plan.decisions {
        match decision {
            Decision::Admit(booking) => {
                println!(
                    "  [book]   #{:<3} {:<14} ch {:<4} {:<12} {}-{}  {}",
                    booking.index,
                    booking.channel,
                    booking.channel_number,
                    booking.day_text(),
                    booking.start_time,
                    booking.end_time,
                    booking.title.as_deref().unwrap_or("")
                );
            }
            Decision::Reject(rejection) => {
                println!(
                    "  [skip]   #{:<3} {:<14} {} ({})",
                    rejection.index,
                    rejection.channel.as_deref().unwrap_or("?"),
                    rejection.title,
                    rejection.reason
                );
            }
        }
    }

    println!();
    print!("{}", plan.summary.display());

    if plan.is_overbooked() {
        println!(
            "\nWarning: peak concurrency {} exceeds capacity {}",
            plan.summary.peak_concurrency, plan.capacity
        );
    }
}
