use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freebox_select::config::Config;
use freebox_select::error::{Error, SelectErrorTrait};
use freebox_select::scheduler::PolicyKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "freebox-select",
    version,
    about = "Schedules Freebox recordings from the MEDIA-select program guide",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configuration
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the guide when stale and update pending entries
    Fetch {
        /// Download even if the guide is up to date
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Recompute pending entries from the stored guides
    Diff,

    /// Decide which pending entries to book
    Plan {
        /// Reference date for day labels (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Admission policy (legacy, interval); overrides the configuration
        #[arg(long)]
        policy: Option<PolicyKind>,

        /// Write the plan to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Cron entry point: fetch, then plan into the data directory
    Run {
        /// Reference date for day labels (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,
    },

    /// Mark the current guide as submitted
    Promote,

    /// Show the channel table or resolve one label
    Channels {
        /// Guide channel label to resolve
        label: Option<String>,
    },
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("freebox-select starting");

    if let Err(err) = dispatch(cli.command, config).await {
        if let Some(e) = err.downcast_ref::<Error>() {
            tracing::error!(
                category = e.category().description(),
                recoverable = e.is_recoverable(),
                error = %e,
                "Command failed"
            );
        } else {
            tracing::error!(error = %err, "Command failed");
        }
        return Err(err);
    }

    tracing::info!("freebox-select completed successfully");
    Ok(())
}

async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Fetch { force } => {
            tracing::info!(force = %force, "Starting fetch command");
            commands::fetch(&config, force).await?;
        }

        Commands::Diff => {
            tracing::info!("Starting diff command");
            commands::diff(&config).await?;
        }

        Commands::Plan {
            today,
            policy,
            output,
        } => {
            tracing::info!(
                today = ?today,
                policy = ?policy,
                output = ?output,
                "Starting plan command"
            );
            commands::plan(&config, today, policy, output).await?;
        }

        Commands::Run { today } => {
            tracing::info!(today = ?today, "Starting run command");
            commands::run(&config, today).await?;
        }

        Commands::Promote => {
            tracing::info!("Starting promote command");
            commands::promote(&config).await?;
        }

        Commands::Channels { label } => {
            commands::channels(&config, label.as_deref())?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("freebox_select=debug,freebox-select=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!(
                "freebox_select={level},freebox-select={level},warn"
            ))
        })
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
