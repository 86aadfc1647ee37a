//! Program-guide ingestion
//!
//! Downloads the weekly MEDIA-select guide, keeps it next to the guide last
//! submitted to the box, and derives the pending entries the scheduler works
//! on.
//!
//! # Modules
//!
//! - [`fetch`] - HTTP download of the guide
//! - [`netrc`] - Credentials from a `.netrc` file
//! - [`store`] - Guide files of the data directory
//! - [`diff`] - Pending entries computation
//! - [`freshness`] - Once-a-day refresh rule

pub mod diff;
pub mod error;
pub mod fetch;
pub mod freshness;
pub mod netrc;
pub mod store;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

pub use diff::pending;
pub use error::{GuideError, GuideResult};
pub use fetch::GuideClient;
pub use freshness::{needs_refresh, FileState};
pub use store::GuideStore;

/// Result of a refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Guide already submitted today or fetched recently
    UpToDate,
    /// Guide downloaded and pending entries rewritten
    Refreshed { fetched: usize, pending: usize },
}

/// Recompute the pending entries from the stored guides
pub async fn update_pending(store: &GuideStore) -> GuideResult<usize> {
    let current = store.load_current().await?;
    let last = store.load_last().await?;

    let pending = diff::pending(&current, &last);
    store.write_pending(&pending).await?;

    tracing::info!(
        current = current.len(),
        submitted = last.len(),
        pending = pending.len(),
        "Pending entries updated"
    );
    Ok(pending.len())
}

/// Download the guide when stale (or when `force` is set) and update the
/// pending entries
pub async fn refresh(
    store: &GuideStore,
    client: &GuideClient,
    now: DateTime<Tz>,
    max_age: Duration,
    force: bool,
) -> GuideResult<RefreshOutcome> {
    store.ensure_dir().await?;

    if !force {
        let last = store.last_state().await?;
        let current = store.current_state().await?;
        if !needs_refresh(now, last.as_ref(), current.as_ref(), max_age) {
            tracing::info!("Guide is up to date, nothing to fetch");
            return Ok(RefreshOutcome::UpToDate);
        }
    }

    let records = client.fetch().await?;
    store.write_current(&records).await?;
    let pending = update_pending(store).await?;

    Ok(RefreshOutcome::Refreshed {
        fetched: records.len(),
        pending,
    })
}
