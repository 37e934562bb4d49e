//! `[logging]` section: level, optional JSON log file, rotation

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// Single file, never rolled
    Never,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log rotation '{0}' (expected hourly, daily or never)")]
pub struct RotationParseError(String);

impl LogRotation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

impl FromStr for LogRotation {
    type Err = RotationParseError;

    /// Case-insensitive; anything else is refused rather than guessed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "never" => Ok(Self::Never),
            _ => Err(RotationParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogRotation {
    type Error = RotationParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LogRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where diagnostics go besides stderr
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter level for the `ui_helper` target, overridden by RUST_LOG
    pub level: String,
    /// Also write JSON lines to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem, e.g. "ui-helper" -> "ui-helper.2024-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "ui-helper".to_string(),
        }
    }
}

/// `[logging]` as written in the file; a bad rotation fails the whole parse
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<PathBuf>,
    pub file_rotation: Option<LogRotation>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file.file_dir.unwrap_or(defaults.file_dir),
            file_rotation: file.file_rotation.unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }
}
