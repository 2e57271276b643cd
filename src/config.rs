use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::monitor::{DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_CONSECUTIVE_ERRORS, DEFAULT_POLL_INTERVAL};
use crate::output::DEFAULT_RECENT_EVENTS;
use crate::providers::DEFAULT_FETCH_TIMEOUT;

/// Where significant events are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMode {
    /// Only the dashboard
    Terminal,
    /// Only desktop notifications
    Desktop,
    #[default]
    Both,
}

impl NotifyMode {
    pub fn includes_desktop(self) -> bool {
        matches!(self, Self::Desktop | Self::Both)
    }
}

/// Configuration file structure for BuildWatch.
///
/// Every value is optional; command-line flags take precedence over the file,
/// and the file over built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// AWS access settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// Polling and alerting behaviour
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Dashboard preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AwsConfig {
    /// Named AWS CLI profile
    pub profile: Option<String>,

    /// AWS region override
    pub region: Option<String>,

    /// Upper bound for a single status query, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MonitorConfig {
    /// Seconds between polls
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Notification delivery mode
    #[serde(default)]
    pub notify: NotifyMode,

    /// Number of events kept in memory
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Consecutive failed fetches tolerated before giving up
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Colorize the dashboard
    #[serde(default = "default_true")]
    pub color: bool,

    /// Events listed on the dashboard
    #[serde(default = "default_recent_events")]
    pub recent_events: usize,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            profile: None,
            region: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            notify: NotifyMode::default(),
            history_capacity: default_history_capacity(),
            max_consecutive_errors: default_max_consecutive_errors(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            recent_events: default_recent_events(),
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_max_consecutive_errors() -> u32 {
    DEFAULT_MAX_CONSECUTIVE_ERRORS
}

fn default_recent_events() -> usize {
    DEFAULT_RECENT_EVENTS
}

fn default_true() -> bool {
    true
}

const CANDIDATES: [&str; 4] = [
    "buildwatch.toml",
    "buildwatch.json",
    "buildwatch.yaml",
    "buildwatch.yml",
];

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./buildwatch.toml, ./buildwatch.json, ./buildwatch.yaml, ./buildwatch.yml
    /// 3. `<user config dir>/buildwatch/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let user_dir = dirs::config_dir().map(|dir| dir.join("buildwatch"));

        match discover(Path::new("."), user_dir.as_deref()) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        log::info!("Loading configuration from {}", path.display());

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

/// First existing config file: the local candidates in `local_dir`, then
/// `config.toml` in `user_dir`.
fn discover(local_dir: &Path, user_dir: Option<&Path>) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| local_dir.join(name))
        .chain(user_dir.map(|dir| dir.join("config.toml")))
        .find(|path| path.is_file())
}
