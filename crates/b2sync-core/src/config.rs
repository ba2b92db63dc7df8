//! Configuration module for B2Sync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, saving, validation, defaults, and a builder pattern for
//! programmatic use.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{domain::SyncPair, ports::ToolOptions};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for B2Sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directories to mirror, synced in this order every cycle.
    #[serde(default)]
    pub sync_pairs: Vec<SyncPair>,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub lock: LockConfig,
}

/// Scheduling and tool invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Time between cycles, e.g. `10m`, `1h`, `30s`.
    #[serde(with = "humantime_serde")]
    pub frequency: Duration,
    /// Passed as `--keep-days N` when greater than 0.
    pub keep_days: u32,
    /// External sync command, resolved on `PATH`.
    pub tool: String,
}

/// Desktop notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Minimum number of files a cycle must upload before a success
    /// notification is shown.
    pub threshold: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Directory holding the daily log files.
    pub dir: PathBuf,
    /// Number of daily log files to keep.
    pub max_files: usize,
}

/// Single-instance lock settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// File holding the PID of the process running a cycle.
    pub pid_file: PathBuf,
}

// ---------------------------------------------------------------------------
// Config::load() / save()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Load from `path` if the file exists, otherwise return defaults.
    ///
    /// Unlike [`Config::load_or_default`], a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load_if_present(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Write the configuration as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/b2sync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        config_root().join("config.yaml")
    }

    /// Options the pair executor applies to every invocation.
    pub fn tool_options(&self) -> ToolOptions {
        ToolOptions {
            keep_days: self.sync.keep_days,
        }
    }

    /// Sync pairs with a leading `~` in the source expanded.
    pub fn resolved_pairs(&self) -> Vec<SyncPair> {
        self.sync_pairs
            .iter()
            .map(|pair| SyncPair::new(expand_home(&pair.source), pair.destination.clone()))
            .collect()
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or when no home directory is known, are
/// returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("b2sync")
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        Self {
            sync_pairs: vec![SyncPair::new(
                home.join("Pictures"),
                "b2://your-bucket-name/Pictures",
            )],
            sync: SyncConfig::default(),
            notifications: NotificationsConfig::default(),
            logging: LoggingConfig::default(),
            lock: LockConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            frequency: Duration::from_secs(10 * 60),
            keep_days: 0,
            tool: "b2".to_string(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { threshold: 5 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("b2sync");
        Self {
            level: "info".to_string(),
            dir: data_dir.join("logs"),
            max_files: 7,
        }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            pid_file: config_root().join("pids").join("b2sync.pid"),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.frequency"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Scheme every destination must use.
const DESTINATION_SCHEME: &str = "b2://";

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. Source directories
    /// are not checked here; a missing source fails only its own pair at
    /// sync time.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- sync_pairs ---
        for (i, pair) in self.sync_pairs.iter().enumerate() {
            if pair.source.as_os_str().is_empty() {
                errors.push(ValidationError {
                    field: format!("sync_pairs[{i}].source"),
                    message: "must not be empty".into(),
                });
            }
            if pair.destination.is_empty() {
                errors.push(ValidationError {
                    field: format!("sync_pairs[{i}].destination"),
                    message: "must not be empty".into(),
                });
            } else if !pair.destination.starts_with(DESTINATION_SCHEME) {
                errors.push(ValidationError {
                    field: format!("sync_pairs[{i}].destination"),
                    message: format!(
                        "must start with '{DESTINATION_SCHEME}', got '{}'",
                        pair.destination
                    ),
                });
            }
        }

        // --- sync ---
        if self.sync.frequency.is_zero() {
            errors.push(ValidationError {
                field: "sync.frequency".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.tool.trim().is_empty() {
            errors.push(ValidationError {
                field: "sync.tool".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.logging.max_files == 0 {
            errors.push(ValidationError {
                field: "logging.max_files".into(),
                message: "must be greater than 0".into(),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] with no sync pairs and allows selective
/// overrides.
///
/// # Example
///
/// ```rust,no_run
/// use b2sync_core::config::ConfigBuilder;
/// use std::time::Duration;
///
/// let config = ConfigBuilder::new()
///     .sync_pair("/home/user/Documents", "b2://backup/Documents")
///     .sync_frequency(Duration::from_secs(300))
///     .notification_threshold(10)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values,
    /// minus the placeholder sync pair.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.sync_pairs.clear();
        Self { config }
    }

    // --- sync_pairs ---

    pub fn sync_pair(mut self, source: impl Into<PathBuf>, destination: impl Into<String>) -> Self {
        self.config
            .sync_pairs
            .push(SyncPair::new(source, destination));
        self
    }

    pub fn sync_pairs(mut self, pairs: Vec<SyncPair>) -> Self {
        self.config.sync_pairs = pairs;
        self
    }

    // --- sync ---

    pub fn sync_frequency(mut self, frequency: Duration) -> Self {
        self.config.sync.frequency = frequency;
        self
    }

    pub fn sync_keep_days(mut self, days: u32) -> Self {
        self.config.sync.keep_days = days;
        self
    }

    pub fn sync_tool(mut self, tool: impl Into<String>) -> Self {
        self.config.sync.tool = tool.into();
        self
    }

    // --- notifications ---

    pub fn notification_threshold(mut self, threshold: u64) -> Self {
        self.config.notifications.threshold = threshold;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_dir(mut self, dir: PathBuf) -> Self {
        self.config.logging.dir = dir;
        self
    }

    pub fn logging_max_files(mut self, n: usize) -> Self {
        self.config.logging.max_files = n;
        self
    }

    // --- lock ---

    pub fn lock_pid_file(mut self, path: PathBuf) -> Self {
        self.config.lock.pid_file = path;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
