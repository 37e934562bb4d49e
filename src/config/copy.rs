//! Copy-to-clipboard feedback settings

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Default delay before a companion button gets its text back
pub const DEFAULT_RESTORE_DELAY_MS: u64 = 2000;

/// Copy feedback configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CopyConfig {
    /// Fallback naming convention: button id = prefix + source id
    pub button_prefix: String,

    /// Explicit source id -> button id mapping (checked before the prefix)
    pub buttons: HashMap<String, String>,

    /// Text shown on the button after a successful copy
    pub feedback_text: String,

    /// How long the feedback text stays up
    pub restore_delay_ms: u64,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            button_prefix: "copy-btn-".to_string(),
            buttons: HashMap::new(),
            feedback_text: "Copied!".to_string(),
            restore_delay_ms: DEFAULT_RESTORE_DELAY_MS,
        }
    }
}

/// Copy settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileCopy {
    pub button_prefix: Option<String>,
    pub feedback_text: Option<String>,
    pub restore_delay_ms: Option<u64>,
    #[serde(default)]
    pub buttons: HashMap<String, String>,
}

impl CopyConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileCopy>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            button_prefix: file.button_prefix.unwrap_or(defaults.button_prefix),
            buttons: file.buttons,
            feedback_text: file.feedback_text.unwrap_or(defaults.feedback_text),
            restore_delay_ms: file.restore_delay_ms.unwrap_or(defaults.restore_delay_ms),
        }
    }

    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }

    /// Id of the feedback button for `source_id`: explicit mapping first,
    /// then the prefix convention
    pub fn companion_button_id(&self, source_id: &str) -> String {
        match self.buttons.get(source_id) {
            Some(button) => button.clone(),
            None => format!("{}{}", self.button_prefix, source_id),
        }
    }
}
