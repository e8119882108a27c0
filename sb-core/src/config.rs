//! Bridge configuration management.
//!
//! Handles loading, saving, and accessing the optional configuration file
//! that controls logging and the mapped-event broadcast stream.
//! Configuration is persisted as TOML on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{SbError, SbResult};
use crate::platform::Platform;

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Event stream settings.
    #[serde(default)]
    pub stream: StreamConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or EnvFilter directive: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

/// Mapped-event stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Broadcast channel capacity. Slow receivers lag past this many events.
    #[serde(default = "default_stream_capacity")]
    pub capacity: usize,

    /// Event kind labels forwarded to the stream (e.g. "error",
    /// "reconnect_attempt"). Empty means every kind.
    #[serde(default)]
    pub kinds: Vec<String>,
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}

fn default_stream_capacity() -> usize {
    constants::DEFAULT_STREAM_CAPACITY
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

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            capacity: default_stream_capacity(),
            kinds: Vec::new(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> SbResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BridgeConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> SbResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SbError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> SbResult<PathBuf> {
        if self.logging.directory.is_empty() {
            let data_dir = Platform::data_dir()?;
            Ok(data_dir.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Reject values that cannot be used to build the bridge.
    pub fn validate(&self) -> SbResult<()> {
        // tokio's broadcast channel panics on zero capacity
        if self.stream.capacity == 0 {
            return Err(SbError::Config("stream.capacity must be greater than 0".into()));
        }
        Ok(())
    }
}
