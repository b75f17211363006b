//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PixsortError, PixsortResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default sort settings.
    pub sort: SortDefaults,

    /// Default output encoding settings.
    pub output: OutputDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default sort parameters.
///
/// Values are kept as strings here and resolved into typed settings by
/// the frame model, so a bad value is reported with the key that held it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SortDefaults {
    /// Sort axis: "x" (rows) or "y" (columns).
    pub axis: String,

    /// Key mode: "channel0" or "luminance".
    pub key: String,

    /// Order: "ascending" or "descending".
    pub order: String,

    /// Worker thread count per frame.
    pub workers: usize,
}

/// Default output encoding parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputDefaults {
    /// Output frame rate used when the source rate is unknown or overridden.
    pub fps: f64,

    /// ffmpeg video codec.
    pub codec: String,

    /// ffmpeg output pixel format.
    pub pix_fmt: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "pixsort=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for SortDefaults {
    fn default() -> Self {
        Self {
            axis: "y".to_string(),
            key: "luminance".to_string(),
            order: "ascending".to_string(),
            workers: 4,
        }
    }
}

impl Default for OutputDefaults {
    fn default() -> Self {
        Self {
            fps: 24.0,
            codec: "libx264".to_string(),
            pix_fmt: "yuv420p".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// A file that exists but cannot be read is returned as the error
    /// alongside the defaults, so callers can report it once logging is up.
    pub fn load() -> (Self, Option<PixsortError>) {
        Self::load_or_default(&config_file_path())
    }

    /// Like [`AppConfig::load`], for an explicit path.
    pub fn load_or_default(path: &Path) -> (Self, Option<PixsortError>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load config from an explicit file. Unlike [`AppConfig::load`], a
    /// missing or malformed file is an error.
    pub fn load_from(path: &Path) -> PixsortResult<Self> {
        if !path.exists() {
            return Err(PixsortError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> PixsortResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> PixsortResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("pixsort").join("config.json")
}
