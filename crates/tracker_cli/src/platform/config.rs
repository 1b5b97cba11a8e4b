//! Tracker configuration: an optional RON file with command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use tracker_core::{PollSettings, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use tracker_engine::{ClientSettings, DEFAULT_BASE_URL};
use tracker_logging::parse_level;

/// Read from the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILENAME: &str = "tracker.ron";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("cannot read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid setting `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// On-disk shape. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TrackerConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub max_attempts: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Validated settings handed to the client, the orchestrator and the logger.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub client: ClientSettings,
    pub poll: PollSettings,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

/// Loads the config file.
///
/// An explicit path must exist. Without one, `tracker.ron` in the working
/// directory is used if present and defaults otherwise.
pub(crate) fn load(path: Option<&Path>) -> Result<TrackerConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(TrackerConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    parse(&content).map_err(|message| ConfigError::Parse { path, message })
}

pub(crate) fn parse(content: &str) -> Result<TrackerConfig, String> {
    ron::from_str(content).map_err(|err| err.to_string())
}

impl TrackerConfig {
    pub(crate) fn apply(&mut self, overrides: Overrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(interval) = overrides.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(max_attempts) = overrides.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
    }

    pub(crate) fn into_settings(self) -> Result<Settings, ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(invalid("base_url", "must not be empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(invalid("poll_interval_ms", "must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "must be at least 1"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(invalid("connect_timeout_secs", "must be at least 1"));
        }
        let log_level = parse_level(&self.log_level).ok_or_else(|| {
            invalid(
                "log_level",
                format!("unknown level {:?}", self.log_level),
            )
        })?;

        Ok(Settings {
            client: ClientSettings {
                base_url: self.base_url,
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
            },
            poll: PollSettings {
                interval: Duration::from_millis(self.poll_interval_ms),
                max_attempts: self.max_attempts,
            },
            log_level,
            log_file: self.log_file,
        })
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}
