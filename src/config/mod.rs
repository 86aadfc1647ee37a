//! Configuration management for freebox-select
//!
//! This module handles loading and validating configuration from a TOML file
//! or from environment variables.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;
use crate::scheduler::{PassConfig, PolicyKind};

/// Default MEDIA-select weekly guide endpoint
pub const DEFAULT_GUIDE_URL: &str = "https://www.media-select.fr/api/v1/progweek";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scheduler configuration; required, it carries the capacity
    pub scheduler: SchedulerConfig,

    /// Guide download configuration
    #[serde(default)]
    pub guide: GuideConfig,

    /// Data files configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Booking configuration
    #[serde(default)]
    pub booking: BookingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of recordings the box can run at once
    pub max_simultaneous_recordings: usize,

    /// Admission policy
    #[serde(default)]
    pub policy: PolicyKind,

    /// IANA time zone of guide timestamps; sets the calendar day used for
    /// day labels and the once-a-day refresh
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Guide download configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Guide endpoint URL
    pub url: String,

    /// Account name for basic authentication
    pub username: Option<String>,

    /// Account password for basic authentication
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// `.netrc` file searched for the guide host when no username is set
    pub netrc_file: Option<PathBuf>,

    /// Age in seconds after which a fetched guide is fetched again
    pub max_age_secs: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Data files configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the guide files and the booking plan
    pub data_dir: PathBuf,

    /// Channel table overrides (TOML)
    pub channels_file: Option<PathBuf>,
}

/// Booking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Name recordings after the guide title
    pub use_guide_titles: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

fn default_timezone() -> String {
    String::from("Europe/Paris")
}

fn default_netrc_file() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".netrc"))
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local/share/select_freeboxos")
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_GUIDE_URL),
            username: None,
            password: None,
            netrc_file: default_netrc_file(),
            max_age_secs: 1800,
            request_timeout_secs: 30,
        }
    }
}

impl fmt::Debug for GuideConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("netrc_file", &self.netrc_file)
            .field("max_age_secs", &self.max_age_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            channels_file: None,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            use_guide_titles: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid value '{raw}' for {key}: {e}")),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Configuration with the given capacity and defaults elsewhere
    pub fn with_capacity(max_simultaneous_recordings: usize) -> Self {
        Self {
            scheduler: SchedulerConfig {
                max_simultaneous_recordings,
                policy: PolicyKind::default(),
                timezone: default_timezone(),
            },
            guide: GuideConfig::default(),
            storage: StorageConfig::default(),
            booking: BookingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// `FREEBOX_SELECT_MAX_SIM_RECORDINGS` is required.
    pub fn from_env() -> Result<Self> {
        let max_simultaneous_recordings: usize =
            env_parse("FREEBOX_SELECT_MAX_SIM_RECORDINGS")?.context(
                "Missing FREEBOX_SELECT_MAX_SIM_RECORDINGS: the number of simultaneous recordings must be configured",
            )?;

        let mut config = Self::with_capacity(max_simultaneous_recordings);

        if let Some(policy) = env_parse::<PolicyKind>("FREEBOX_SELECT_POLICY")? {
            config.scheduler.policy = policy;
        }
        if let Ok(timezone) = std::env::var("FREEBOX_SELECT_TIMEZONE") {
            config.scheduler.timezone = timezone;
        }

        if let Ok(url) = std::env::var("FREEBOX_SELECT_GUIDE_URL") {
            config.guide.url = url;
        }
        config.guide.username = std::env::var("FREEBOX_SELECT_GUIDE_USER").ok();
        config.guide.password = std::env::var("FREEBOX_SELECT_GUIDE_PASSWORD").ok();
        if let Some(netrc) = std::env::var_os("FREEBOX_SELECT_NETRC") {
            config.guide.netrc_file = Some(PathBuf::from(netrc));
        }
        if let Some(max_age) = env_parse("FREEBOX_SELECT_GUIDE_MAX_AGE")? {
            config.guide.max_age_secs = max_age;
        }
        if let Some(timeout) = env_parse("FREEBOX_SELECT_REQUEST_TIMEOUT")? {
            config.guide.request_timeout_secs = timeout;
        }

        if let Some(dir) = std::env::var_os("FREEBOX_SELECT_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        config.storage.channels_file =
            std::env::var_os("FREEBOX_SELECT_CHANNELS_FILE").map(PathBuf::from);

        if let Some(use_titles) = env_parse("FREEBOX_SELECT_USE_TITLES")? {
            config.booking.use_guide_titles = use_titles;
        }

        if let Ok(level) = std::env::var("FREEBOX_SELECT_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("FREEBOX_SELECT_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path` when given, from the environment otherwise, and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.scheduler.max_simultaneous_recordings == 0 {
            return Err(Error::config(
                "max_simultaneous_recordings must be greater than 0",
            ));
        }

        self.timezone()?;

        url::Url::parse(&self.guide.url)
            .map_err(|e| Error::config(format!("Invalid guide url '{}': {e}", self.guide.url)))?;

        if self.guide.request_timeout_secs == 0 {
            return Err(Error::config("request_timeout_secs must be greater than 0"));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(Error::config(format!(
                "Unknown log format '{}'. Expected text or json",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Time zone of the guide
    pub fn timezone(&self) -> crate::error::Result<Tz> {
        let name = self.scheduler.timezone.trim();
        name.parse::<Tz>()
            .map_err(|e| Error::config(format!("Unknown timezone '{name}': {e}")))
    }

    /// `instant` on the guide's wall clock
    pub fn guide_time(&self, instant: DateTime<Utc>) -> crate::error::Result<DateTime<Tz>> {
        Ok(instant.with_timezone(&self.timezone()?))
    }

    /// Current time on the guide's wall clock
    pub fn now(&self) -> crate::error::Result<DateTime<Tz>> {
        self.guide_time(Utc::now())
    }

    /// Today's date in the guide's time zone
    pub fn today(&self) -> crate::error::Result<NaiveDate> {
        Ok(self.now()?.date_naive())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.guide.request_timeout_secs)
    }

    /// Age after which the fetched guide is stale
    #[must_use]
    pub fn guide_max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.guide.max_age_secs).unwrap_or(i64::MAX))
    }

    /// Settings of a scheduling pass
    #[must_use]
    pub fn pass_config(&self) -> PassConfig {
        PassConfig::new(self.scheduler.max_simultaneous_recordings)
            .with_policy(self.scheduler.policy)
            .with_guide_titles(self.booking.use_guide_titles)
    }
}
