//! End-to-end tests of plan building over a data directory

mod common;

use common::{committed, prog, today};
use freebox_select::config::Config;
use freebox_select::error::{Error, ErrorCategory, SelectErrorTrait};
use freebox_select::guide::{self, GuideStore};
use freebox_select::models::GuideRecord;
use freebox_select::pipeline::{build_plan, build_plan_with, PlanOutcome};
use freebox_select::scheduler::{BookingPlan, DayLabel, PolicyKind, RejectReason};
use std::io::Write;
use tempfile::TempDir;

async fn setup(current: &[GuideRecord], last: &[GuideRecord]) -> (TempDir, GuideStore, Config) {
    let dir = TempDir::new().unwrap();
    let store = GuideStore::new(dir.path());

    if !last.is_empty() {
        store.write_current(last).await.unwrap();
        store.promote().await.unwrap();
    }
    store.write_current(current).await.unwrap();
    guide::update_pending(&store).await.unwrap();

    let mut config = Config::with_capacity(2);
    config.storage.data_dir = dir.path().to_path_buf();
    (dir, store, config)
}

#[tokio::test]
async fn test_plan_over_pending_entries() {
    let last = vec![committed("0900", 3600)];
    let mut current = last.clone();
    current.extend([
        prog("TF1", "1000", 3600),
        prog("France 2", "1030", 3600),
        prog("France 3", "1045", 1800),
    ]);
    let (_dir, store, config) = setup(&current, &last).await;

    let outcome = build_plan(&config, &store, today()).await.unwrap();
    let PlanOutcome::Planned(plan) = outcome else {
        panic!("expected a plan");
    };

    // The committed 09:00 entry is not pending
    assert_eq!(plan.summary.candidates, 3);
    assert_eq!(plan.summary.committed, 1);
    assert_eq!(plan.summary.admitted, 2);
    assert_eq!(plan.policy, PolicyKind::Legacy);

    let numbers: Vec<&str> = plan.bookings().map(|b| b.channel_number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2"]);
    assert_eq!(plan.bookings().next().unwrap().day_text(), "Aujourd");
}

#[tokio::test]
async fn test_today_taken_in_guide_time_zone() {
    // 23:30 UTC on the 15th is 00:30 on the 16th in Paris
    let current = vec![serde_json::json!({
        "channel": "TF1",
        "title": "Film de minuit",
        "start": "202401160030",
        "duration": 5400,
    })];
    let (_dir, store, config) = setup(&current, &[]).await;
    assert_eq!(config.scheduler.timezone, "Europe/Paris");

    let instant = today().and_hms_opt(23, 30, 0).unwrap().and_utc();
    let guide_today = config.guide_time(instant).unwrap().date_naive();
    assert_eq!(guide_today, today().succ_opt().unwrap());

    let PlanOutcome::Planned(plan) = build_plan(&config, &store, guide_today).await.unwrap() else {
        panic!("expected a plan");
    };
    let booking = plan.bookings().next().unwrap();
    assert_eq!(booking.day_label, DayLabel::Today);
    assert_eq!(booking.day_text(), "Aujourd");
}

#[tokio::test]
async fn test_empty_pending_promotes_current() {
    let current = vec![prog("TF1", "1000", 3600)];
    let (_dir, store, config) = setup(&current, &current).await;
    assert!(store.load_pending().await.unwrap().is_empty());

    let outcome = build_plan(&config, &store, today()).await.unwrap();
    assert_eq!(outcome, PlanOutcome::NothingToRecord);
    assert_eq!(store.load_last().await.unwrap(), current);
}

#[tokio::test]
async fn test_empty_current_guide_is_nothing_to_record() {
    let (_dir, store, config) = setup(&[], &[]).await;

    let outcome = build_plan(&config, &store, today()).await.unwrap();
    assert_eq!(outcome, PlanOutcome::NothingToRecord);
    assert!(store.load_last().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_pending_file_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let store = GuideStore::new(dir.path());
    store.write_current(&[prog("TF1", "1000", 60)]).await.unwrap();

    let config = Config::with_capacity(1);
    let err = build_plan(&config, &store, today()).await.unwrap_err();

    assert!(matches!(err, Error::Guide(_)));
    assert_eq!(err.category(), ErrorCategory::Storage);
}

#[tokio::test]
async fn test_malformed_pending_entry_aborts_plan() {
    let current = vec![
        prog("TF1", "1000", 3600),
        serde_json::json!({"channel": "Arte", "title": "Sans horaire", "duration": 60}),
    ];
    let (_dir, store, config) = setup(&current, &[]).await;

    let err = build_plan(&config, &store, today()).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Parsing);
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_channel_overrides_file() {
    let current = vec![prog("Chaîne Locale", "2000", 3600)];
    let (dir, store, mut config) = setup(&current, &[]).await;

    let channels = dir.path().join("channels.toml");
    let mut file = std::fs::File::create(&channels).unwrap();
    writeln!(file, "[channels]\n\"Chaîne Locale\" = \"31\"").unwrap();
    config.storage.channels_file = Some(channels);

    let PlanOutcome::Planned(plan) = build_plan(&config, &store, today()).await.unwrap() else {
        panic!("expected a plan");
    };
    assert_eq!(plan.bookings().next().unwrap().channel_number, "31");
}

#[tokio::test]
async fn test_explicit_policy_and_saved_plan() {
    let current = vec![prog("TF1", "2000", 3600), prog("Arte", "0800", 3600), prog("Inconnue", "0900", 60)];
    let (_dir, store, config) = setup(&current, &[]).await;

    let pass = config.pass_config().with_policy(PolicyKind::Interval);
    let PlanOutcome::Planned(plan) = build_plan_with(&config, pass, &store, today()).await.unwrap()
    else {
        panic!("expected a plan");
    };
    assert_eq!(plan.summary.admitted, 2);
    assert_eq!(
        plan.decisions[2].reject_reason(),
        Some(RejectReason::ChannelNotFound)
    );

    plan.save_to_file(store.plan_path()).await.unwrap();
    let loaded = BookingPlan::load_from_file(store.plan_path()).await.unwrap();
    assert_eq!(loaded, plan);
}
