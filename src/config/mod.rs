//! Configuration for the UI helper
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/ui-helper/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod copy;
mod markers;
mod observability;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use copy::{CopyConfig, FileCopy, DEFAULT_RESTORE_DELAY_MS};
pub use markers::{FileMarkers, Markers};
pub use observability::{FileLogging, LogRotation, LoggingConfig, RotationParseError};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var overriding `[logging] level`
pub const ENV_LOG_LEVEL: &str = "UI_HELPER_LOG_LEVEL";

/// Env var overriding `[copy] restore_delay_ms`
pub const ENV_COPY_DELAY: &str = "UI_HELPER_COPY_DELAY_MS";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Marker classes shared with the page markup
    pub markers: Markers,

    /// Copy feedback behavior
    pub copy: CopyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    /// Optional [markers] section
    pub markers: Option<FileMarkers>,

    /// Optional [copy] section
    pub copy: Option<FileCopy>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/ui-helper/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("ui-helper").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        // Write config (ignore errors - config is optional)
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Read and parse a config file; a missing file yields defaults
    pub(crate) fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    /// Load configuration: env vars -> file -> defaults
    ///
    /// A config file that exists but doesn't parse is an error rather than
    /// a silent fallback to defaults.
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Load from an explicit file path (no env overrides)
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = Self::load_file_config(path)?;
        Ok(Self::from_sources(file, |_| None))
    }

    /// Merge file config with env lookups
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let markers = Markers::from_file(file.markers);
        let mut copy = CopyConfig::from_file(file.copy);
        let mut logging = LoggingConfig::from_file(file.logging);

        // Log level: env > file > default
        if let Some(level) = env(ENV_LOG_LEVEL) {
            logging.level = level;
        }

        // Restore delay: env > file > default (unparseable env values are ignored)
        if let Some(delay) = env(ENV_COPY_DELAY).and_then(|v| v.parse().ok()) {
            copy.restore_delay_ms = delay;
        }

        Self {
            markers,
            copy,
            logging,
        }
    }
}
