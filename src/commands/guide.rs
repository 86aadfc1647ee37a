use anyhow::{Context, Result};

use freebox_select::config::Config;
use freebox_select::error::Error;
use freebox_select::guide::{self, GuideClient, GuideStore, RefreshOutcome};
use freebox_select::utils::format_bytes;

pub async fn fetch(config: &Config, force: bool) -> Result<RefreshOutcome> {
    println!("Fetching program guide");
    println!("======================");

    let store = GuideStore::new(&config.storage.data_dir);
    let client = GuideClient::new(&config.guide).context("Failed to create guide client")?;
    println!("Source:    {}", client.url());
    println!("Data dir:  {}", store.data_dir().display());

    let now = config.now()?;
    let outcome = guide::refresh(&store, &client, now, config.guide_max_age(), force)
        .await
        .map_err(Error::from)?;

    match outcome {
        RefreshOutcome::UpToDate => {
            println!("\nGuide is up to date, nothing fetched");
        }
        RefreshOutcome::Refreshed { fetched, pending } => {
            let size = tokio::fs::metadata(store.current_path())
                .await
                .map(|m| m.len())
                .unwrap_or(0);
            println!("\nFetched:   {fetched} entries ({})", format_bytes(size));
            println!("Pending:   {pending} entries");
        }
    }

    Ok(outcome)
}

pub async fn diff(config: &Config) -> Result<()> {
    let store = GuideStore::new(&config.storage.data_dir);
    let pending = guide::update_pending(&store)
        .await
        .map_err(Error::from)?;

    println!("Pending entries: {pending}");
    println!("Written to {}", store.pending_path().display());
    Ok(())
}

pub async fn promote(config: &Config) -> Result<()> {
    let store = GuideStore::new(&config.storage.data_dir);
    let bytes = store.promote().await.map_err(Error::from)?;

    println!(
        "Promoted {} to {} ({})",
        store.current_path().display(),
        store.last_path().display(),
        format_bytes(bytes)
    );
    Ok(())
}
