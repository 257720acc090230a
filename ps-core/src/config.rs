//! Application configuration management.
//!
//! Handles loading, saving, and accessing the simulator configuration:
//! database location and pooling, logging, the notes blob directory, status
//! bar polling intervals and telemetry bounds, and the simulated-reply
//! behaviour of the messages app. Configuration is persisted as TOML on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{PsError, PsResult};
use crate::platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Notes blob store settings.
    #[serde(default)]
    pub notes: NotesConfig,

    /// Status bar polling and telemetry settings.
    #[serde(default)]
    pub status_bar: StatusBarConfig,

    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Simulated contact behaviour.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. If empty, uses default location.
    #[serde(default)]
    pub path: String,

    /// Enable WAL (Write-Ahead Logging) mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Run integrity check on startup.
    #[serde(default)]
    pub integrity_check_on_startup: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

/// Notes blob store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Directory holding one JSON file per blob key. If empty, uses default location.
    #[serde(default)]
    pub directory: String,
}

/// Status bar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBarConfig {
    /// Seconds between unread-notification refreshes.
    #[serde(default = "default_notification_poll_secs")]
    pub notification_poll_secs: u64,

    /// Seconds between clock re-renders.
    #[serde(default = "default_clock_tick_secs")]
    pub clock_tick_secs: u64,

    /// Seconds between simulated telemetry changes.
    #[serde(default = "default_telemetry_tick_secs")]
    pub telemetry_tick_secs: u64,

    /// Battery percentage when the status bar mounts.
    #[serde(default = "default_initial_battery")]
    pub initial_battery: f64,

    /// Battery percentage the simulated drain never goes below.
    #[serde(default = "default_battery_floor")]
    pub battery_floor: f64,

    /// Maximum number of per-app badges shown next to the clock.
    #[serde(default = "default_max_badges")]
    pub max_badges: usize,
}

/// Display settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Use 24-hour time format.
    #[serde(default)]
    pub use_24hr_format: bool,
}

/// Simulated contact behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Send a canned reply after the user sends a message.
    #[serde(default = "default_true")]
    pub auto_reply: bool,

    /// Delay before the canned reply arrives, in milliseconds.
    #[serde(default = "default_auto_reply_delay_ms")]
    pub auto_reply_delay_ms: u64,

    /// Contact name the canned reply comes from.
    #[serde(default = "default_auto_reply_sender")]
    pub auto_reply_sender: String,
}

// Default value functions for serde

fn default_true() -> bool {
    true
}

fn default_pool_size() -> u32 {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_notification_poll_secs() -> u64 {
    10
}

fn default_clock_tick_secs() -> u64 {
    60
}

fn default_telemetry_tick_secs() -> u64 {
    30
}

fn default_initial_battery() -> f64 {
    75.0
}

fn default_battery_floor() -> f64 {
    20.0
}

fn default_max_badges() -> usize {
    3
}

fn default_auto_reply_delay_ms() -> u64 {
    2_000
}

fn default_auto_reply_sender() -> String {
    "Alice Johnson".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            wal_mode: true,
            pool_size: default_pool_size(),
            integrity_check_on_startup: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            notification_poll_secs: default_notification_poll_secs(),
            clock_tick_secs: default_clock_tick_secs(),
            telemetry_tick_secs: default_telemetry_tick_secs(),
            initial_battery: default_initial_battery(),
            battery_floor: default_battery_floor(),
            max_badges: default_max_badges(),
        }
    }
}

impl StatusBarConfig {
    /// Interval between unread-notification refreshes.
    pub fn notification_poll(&self) -> Duration {
        Duration::from_secs(self.notification_poll_secs.max(1))
    }

    /// Interval between clock re-renders.
    pub fn clock_tick(&self) -> Duration {
        Duration::from_secs(self.clock_tick_secs.max(1))
    }

    /// Interval between telemetry changes.
    pub fn telemetry_tick(&self) -> Duration {
        Duration::from_secs(self.telemetry_tick_secs.max(1))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            auto_reply: true,
            auto_reply_delay_ms: default_auto_reply_delay_ms(),
            auto_reply_sender: default_auto_reply_sender(),
        }
    }
}

impl SimulationConfig {
    /// Delay before the canned reply arrives.
    pub fn auto_reply_delay(&self) -> Duration {
        Duration::from_millis(self.auto_reply_delay_ms)
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> PsResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> PsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file path.
    pub fn save_default(&self) -> PsResult<()> {
        let path = Self::default_config_path()?;
        self.save_to_file(&path)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> PsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| PsError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PsResult<PathBuf> {
        Ok(platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective database path, using the configured path or the default.
    pub fn effective_db_path(&self) -> PsResult<PathBuf> {
        if self.database.path.is_empty() {
            Ok(platform::data_dir()?.join(constants::DEFAULT_DB_FILE))
        } else {
            Ok(PathBuf::from(&self.database.path))
        }
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> PsResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Get the effective notes blob directory, using the configured path or the default.
    pub fn effective_notes_dir(&self) -> PsResult<PathBuf> {
        if self.notes.directory.is_empty() {
            Ok(platform::data_dir()?.join("blobs"))
        } else {
            Ok(PathBuf::from(&self.notes.directory))
        }
    }
}

/// Thread-safe configuration holder for shared access across services.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<AppConfig>>,
}

impl ConfigHandle {
    /// Create a new configuration handle.
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Read the configuration.
    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.read().await
    }

    /// Write/update the configuration.
    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, AppConfig> {
        self.inner.write().await
    }

    /// Clone out the current configuration.
    pub async fn snapshot(&self) -> AppConfig {
        self.inner.read().await.clone()
    }

    /// Save the current configuration to disk.
    pub async fn save(&self) -> PsResult<()> {
        let config = self.inner.read().await;
        config.save_default()
    }
}
