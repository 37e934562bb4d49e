//! Marker classes the page uses to talk to the helper

use serde::Deserialize;

/// Class names (and the overflow value) the helper reads and writes
#[derive(Debug, Clone, PartialEq)]
pub struct Markers {
    /// Present while an overlay is hidden
    pub hidden: String,

    /// Present while an overlay is shown (flex layout)
    pub visible: String,

    /// Click-catching element behind modal content
    pub backdrop: String,

    /// Element whose id open/close operate on
    pub container: String,

    /// Body overflow value while an overlay suppresses scrolling
    pub scroll_lock: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            hidden: "hidden".to_string(),
            visible: "flex".to_string(),
            backdrop: "modal-overlay".to_string(),
            container: "modal-container".to_string(),
            scroll_lock: "hidden".to_string(),
        }
    }
}

/// Marker settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileMarkers {
    pub hidden: Option<String>,
    pub visible: Option<String>,
    pub backdrop: Option<String>,
    pub container: Option<String>,
    pub scroll_lock: Option<String>,
}

impl Markers {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileMarkers>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            hidden: file.hidden.unwrap_or(defaults.hidden),
            visible: file.visible.unwrap_or(defaults.visible),
            backdrop: file.backdrop.unwrap_or(defaults.backdrop),
            container: file.container.unwrap_or(defaults.container),
            scroll_lock: file.scroll_lock.unwrap_or(defaults.scroll_lock),
        }
    }
}
