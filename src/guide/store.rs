//! Guide files in the data directory
//!
//! | File | Content |
//! |------|---------|
//! | `info_progs.json` | guide as last fetched |
//! | `info_progs_last.json` | guide as last submitted to the box |
//! | `progs_to_record.json` | entries of the former not in the latter |
//! | `booking_plan.json` | decisions of the last scheduling pass |

use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::{GuideError, GuideResult};
use super::freshness::FileState;
use crate::models::GuideRecord;

pub const CURRENT_FILE: &str = "info_progs.json";
pub const LAST_FILE: &str = "info_progs_last.json";
pub const PENDING_FILE: &str = "progs_to_record.json";
pub const PLAN_FILE: &str = "booking_plan.json";

/// Access to the guide files of one data directory
#[derive(Debug, Clone)]
pub struct GuideStore {
    data_dir: PathBuf,
}

impl GuideStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn current_path(&self) -> PathBuf {
        self.data_dir.join(CURRENT_FILE)
    }

    pub fn last_path(&self) -> PathBuf {
        self.data_dir.join(LAST_FILE)
    }

    pub fn pending_path(&self) -> PathBuf {
        self.data_dir.join(PENDING_FILE)
    }

    pub fn plan_path(&self) -> PathBuf {
        self.data_dir.join(PLAN_FILE)
    }

    /// Create the data directory if needed
    pub async fn ensure_dir(&self) -> GuideResult<()> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| GuideError::io(&self.data_dir, e))
    }

    /// Guide as last fetched; must exist
    pub async fn load_current(&self) -> GuideResult<Vec<GuideRecord>> {
        read_records(&self.current_path())
            .await?
            .ok_or_else(|| GuideError::Missing {
                path: self.current_path(),
            })
    }

    /// Guide as last submitted; empty when never submitted
    pub async fn load_last(&self) -> GuideResult<Vec<GuideRecord>> {
        Ok(read_records(&self.last_path()).await?.unwrap_or_default())
    }

    /// Pending entries; must exist
    pub async fn load_pending(&self) -> GuideResult<Vec<GuideRecord>> {
        read_records(&self.pending_path())
            .await?
            .ok_or_else(|| GuideError::Missing {
                path: self.pending_path(),
            })
    }

    pub async fn write_current(&self, records: &[GuideRecord]) -> GuideResult<()> {
        write_records(&self.current_path(), records).await
    }

    pub async fn write_pending(&self, records: &[GuideRecord]) -> GuideResult<()> {
        write_records(&self.pending_path(), records).await
    }

    /// Mark the current guide as submitted
    pub async fn promote(&self) -> GuideResult<u64> {
        let src = self.current_path();
        match tokio::fs::copy(&src, self.last_path()).await {
            Ok(bytes) => {
                tracing::info!(bytes, "Promoted current guide to last submitted");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(GuideError::Missing { path: src }),
            Err(e) => Err(GuideError::io(src, e)),
        }
    }

    /// Modification time and size of the current guide
    pub async fn current_state(&self) -> GuideResult<Option<FileState>> {
        file_state(&self.current_path()).await
    }

    /// Modification time and size of the last submitted guide
    pub async fn last_state(&self) -> GuideResult<Option<FileState>> {
        file_state(&self.last_path()).await
    }
}

async fn read_records(path: &Path) -> GuideResult<Option<Vec<GuideRecord>>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(GuideError::io(path, e)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| GuideError::InvalidJson {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

async fn write_records(path: &Path, records: &[GuideRecord]) -> GuideResult<()> {
    let json = serde_json::to_vec_pretty(records).map_err(|e| GuideError::InvalidJson {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    tokio::fs::write(path, json)
        .await
        .map_err(|e| GuideError::io(path, e))
}

async fn file_state(path: &Path) -> GuideResult<Option<FileState>> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(GuideError::io(path, e)),
    };

    let modified = metadata.modified().map_err(|e| GuideError::io(path, e))?;

    Ok(Some(FileState {
        modified: DateTime::<Utc>::from(modified),
        size: metadata.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = GuideStore::new(temp_dir.path());

        assert!(matches!(
            store.load_current().await,
            Err(GuideError::Missing { .. })
        ));
        assert!(store.load_last().await.unwrap().is_empty());
        assert!(store.current_state().await.unwrap().is_none());
        assert!(matches!(store.promote().await, Err(GuideError::Missing { .. })));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = GuideStore::new(temp_dir.path());

        tokio::fs::write(store.current_path(), "").await.unwrap();
        assert!(matches!(
            store.load_current().await,
            Err(GuideError::InvalidJson { .. })
        ));

        tokio::fs::write(store.last_path(), "{\"start\": 1}").await.unwrap();
        assert!(matches!(
            store.load_last().await,
            Err(GuideError::InvalidJson { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_then_promote() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = GuideStore::new(temp_dir.path().join("nested"));
        store.ensure_dir().await.unwrap();

        let records = vec![json!({"channel": "Arte", "start": "202401151000", "duration": 60})];
        store.write_current(&records).await.unwrap();

        let state = store.current_state().await.unwrap().unwrap();
        assert!(state.size > 0);

        store.promote().await.unwrap();
        assert_eq!(store.load_last().await.unwrap(), records);
    }
}
