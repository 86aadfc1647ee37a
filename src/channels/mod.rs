//! Guide channel label to Freebox channel number lookup
//!
//! The guide names channels by label ("France 2") while the booking form
//! selects them by the box's channel number ("2"). A built-in table covers
//! the free-to-air lineup; an optional TOML file adds or overrides entries:
//!
//! ```toml
//! [channels]
//! "France 2" = "2"
//! "Paris Première" = "41"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Free-to-air lineup as labelled by MEDIA-select
const BUILTIN_CHANNELS: &[(&str, &str)] = &[
    ("TF1", "1"),
    ("France 2", "2"),
    ("France 3", "3"),
    ("Canal+", "4"),
    ("France 5", "5"),
    ("M6", "6"),
    ("Arte", "7"),
    ("C8", "8"),
    ("W9", "9"),
    ("TMC", "10"),
    ("TFX", "11"),
    ("NRJ 12", "12"),
    ("LCP", "13"),
    ("France 4", "14"),
    ("BFM TV", "15"),
    ("CNews", "16"),
    ("CStar", "17"),
    ("Gulli", "18"),
    ("TF1 Séries Films", "20"),
    ("L'Equipe", "21"),
    ("6ter", "22"),
    ("RMC Story", "23"),
    ("RMC Découverte", "24"),
    ("Chérie 25", "25"),
    ("LCI", "26"),
    ("franceinfo:", "27"),
];

/// Errors loading a channel table
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Override file cannot be read
    #[error("Cannot read channel file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Override file is not a valid channel table
    #[error("Invalid channel file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

#[derive(Debug, Deserialize)]
struct ChannelFile {
    #[serde(default)]
    channels: BTreeMap<String, String>,
}

/// Static label to channel-number mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTable {
    entries: BTreeMap<String, String>,
}

impl ChannelTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in lineup
    pub fn builtin() -> Self {
        BUILTIN_CHANNELS.iter().copied().collect()
    }

    /// Parse a TOML channel table
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let file: ChannelFile = toml::from_str(content)?;
        Ok(Self {
            entries: file.channels,
        })
    }

    /// Load a TOML channel table from disk
    pub fn from_file(path: &Path) -> Result<Self, ChannelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ChannelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|e| ChannelError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Built-in lineup, overridden by `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self, ChannelError> {
        let mut table = Self::builtin();
        if let Some(path) = path {
            let overrides = Self::from_file(path)?;
            tracing::debug!(
                path = %path.display(),
                entries = overrides.len(),
                "Loaded channel overrides"
            );
            table.merge(overrides);
        }
        Ok(table)
    }

    /// Add entries of `other`, replacing labels already present
    pub fn merge(&mut self, other: ChannelTable) {
        self.entries.extend(other.entries);
    }

    pub fn insert(&mut self, label: impl Into<String>, number: impl Into<String>) {
        self.entries.insert(label.into(), number.into());
    }

    /// Channel number for a guide label, exact match
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by label
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, n)| (l.as_str(), n.as_str()))
    }
}

impl<L: Into<String>, N: Into<String>> FromIterator<(L, N)> for ChannelTable {
    fn from_iter<I: IntoIterator<Item = (L, N)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(l, n)| (l.into(), n.into()))
                .collect(),
        }
    }
}
