//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize the [copy.buttons] table
    fn buttons_to_toml(&self) -> String {
        if self.copy.buttons.is_empty() {
            return r#"
# Explicit companion buttons (source id -> button id), checked before the prefix
# [copy.buttons]
# "api-key" = "api-key-copy"
"#
            .to_string();
        }

        let mut output = String::from("\n[copy.buttons]\n");
        // Sort keys for deterministic output
        let mut keys: Vec<_> = self.copy.buttons.keys().collect();
        keys.sort();

        for source in keys {
            output.push_str(&format!("{:?} = {:?}\n", source, self.copy.buttons[source]));
        }
        output
    }

    /// Render the full config file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# ui-helper configuration

# Marker classes shared with the page markup
[markers]
hidden = {hidden:?}
visible = {visible:?}
backdrop = {backdrop:?}
container = {container:?}
# Body overflow value while a modal is open
scroll_lock = {scroll_lock:?}

# Copy-to-clipboard feedback
[copy]
button_prefix = {prefix:?}
feedback_text = {feedback:?}
restore_delay_ms = {delay}
{buttons}
# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
# File logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix:?}
"#,
            hidden = self.markers.hidden,
            visible = self.markers.visible,
            backdrop = self.markers.backdrop,
            container = self.markers.container,
            scroll_lock = self.markers.scroll_lock,
            prefix = self.copy.button_prefix,
            feedback = self.copy.feedback_text,
            delay = self.copy.restore_delay_ms,
            buttons = self.buttons_to_toml(),
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
