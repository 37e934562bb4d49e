//! Copy an element's text to the clipboard with button feedback
//!
//! The source text is read and the clipboard write started synchronously;
//! everything after the write settles runs on a spawned task. On success the
//! companion button shows the feedback text and gets its previous text back
//! after the restore delay. The restore timer can't be cancelled: a second
//! copy inside the window snapshots the feedback text itself, and its restore
//! leaves that in place.

use crate::clipboard::Clipboard;
use crate::config::CopyConfig;
use crate::document::{lock, NodeId, SharedDocument};
use anyhow::{Context, Result};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Failures reported to the caller of a copy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CopyError {
    /// No element with the source id
    #[error("Copy source element not found: {0}")]
    SourceNotFound(String),
}

/// How a copy ended, once the clipboard write settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text is on the clipboard and the button shows feedback
    Copied { button_id: String },
    /// Text is on the clipboard but there was no button to update
    ButtonMissing { button_id: String },
    /// Clipboard rejected the write; the page was left alone
    ClipboardFailed { reason: String },
}

/// Handle to an in-flight copy; drop it for fire-and-forget
#[derive(Debug)]
pub struct CopyTask {
    handle: JoinHandle<CopyOutcome>,
}

impl CopyTask {
    /// Wait for the clipboard write to settle
    pub async fn outcome(self) -> Result<CopyOutcome> {
        self.handle.await.context("Copy task failed")
    }
}

/// Start copying the text of `source_id`
///
/// Must be called from within a tokio runtime.
pub fn copy_element_text(
    document: &SharedDocument,
    config: &Arc<CopyConfig>,
    clipboard: &dyn Clipboard,
    source_id: &str,
) -> std::result::Result<CopyTask, CopyError> {
    let text = {
        let doc = lock(document);
        let node = doc
            .get_element_by_id(source_id)
            .ok_or_else(|| CopyError::SourceNotFound(source_id.to_string()))?;
        doc.inner_text(node)
    };

    tracing::debug!(source_id, len = text.len(), "Writing to clipboard");
    let write = clipboard.write_text(text);

    let document = Arc::clone(document);
    let config = Arc::clone(config);
    let source_id = source_id.to_string();

    let handle = tokio::spawn(async move {
        match write.await {
            Ok(()) => show_feedback(&document, &config, &source_id),
            Err(e) => {
                tracing::error!("Failed to copy: {:#}", e);
                CopyOutcome::ClipboardFailed {
                    reason: e.to_string(),
                }
            }
        }
    });

    Ok(CopyTask { handle })
}

/// Swap the companion button's text and schedule the restore
fn show_feedback(
    document: &SharedDocument,
    config: &CopyConfig,
    source_id: &str,
) -> CopyOutcome {
    let button_id = config.companion_button_id(source_id);

    let (button, original) = {
        let mut doc = lock(document);
        let Some(button) = doc.get_element_by_id(&button_id) else {
            tracing::error!("Failed to copy: companion button {} not found", button_id);
            return CopyOutcome::ButtonMissing { button_id };
        };
        let original = doc.inner_text(button);
        doc.set_inner_text(button, &config.feedback_text);
        (button, original)
    };

    schedule_restore(Arc::clone(document), button, original, config);
    CopyOutcome::Copied { button_id }
}

fn schedule_restore(
    document: SharedDocument,
    button: NodeId,
    original: String,
    config: &CopyConfig,
) {
    let delay = config.restore_delay();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        lock(&document).set_inner_text(button, &original);
        tracing::trace!("Restored copy button text");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::document::Document;
    use crate::logging::{CaptureLayer, LogBuffer, LogLevel};
    use std::time::Duration;
    use tokio::time::sleep;
    use tracing_subscriber::layer::SubscriberExt;

    fn page() -> SharedDocument {
        let mut doc = Document::new();
        doc.add_element(None, Some("api-key"), &[], "ABC123");
        doc.add_element(None, Some("copy-btn-api-key"), &[], "Copy");
        doc.into_shared()
    }

    fn button_text(document: &SharedDocument, id: &str) -> String {
        let doc = lock(document);
        doc.inner_text(doc.get_element_by_id(id).unwrap())
    }

    fn capture() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let buffer = LogBuffer::new();
        let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(buffer.clone()));
        (buffer, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_then_restore_after_delay() {
        let document = page();
        let config = Arc::new(CopyConfig::default());
        let clipboard = MemoryClipboard::new();

        let task = copy_element_text(&document, &config, &clipboard, "api-key").unwrap();
        assert_eq!(
            task.outcome().await.unwrap(),
            CopyOutcome::Copied {
                button_id: "copy-btn-api-key".into()
            }
        );
        assert_eq!(clipboard.contents().as_deref(), Some("ABC123"));
        assert_eq!(button_text(&document, "copy-btn-api-key"), "Copied!");

        sleep(Duration::from_millis(1990)).await;
        assert_eq!(button_text(&document, "copy-btn-api-key"), "Copied!");

        sleep(Duration::from_millis(20)).await;
        assert_eq!(button_text(&document, "copy-btn-api-key"), "Copy");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clipboard_failure_leaves_button_and_logs() {
        let (logs, _guard) = capture();
        let document = page();
        let config = Arc::new(CopyConfig::default());
        let clipboard = MemoryClipboard::failing("permission denied");

        let task = copy_element_text(&document, &config, &clipboard, "api-key").unwrap();
        assert_eq!(
            task.outcome().await.unwrap(),
            CopyOutcome::ClipboardFailed {
                reason: "permission denied".into()
            }
        );
        assert_eq!(button_text(&document, "copy-btn-api-key"), "Copy");

        let errors = logs.at_level(LogLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Failed to copy: permission denied");
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let document = page();
        let config = Arc::new(CopyConfig::default());
        let clipboard = MemoryClipboard::new();

        let err = copy_element_text(&document, &config, &clipboard, "missing").unwrap_err();
        assert_eq!(err, CopyError::SourceNotFound("missing".into()));
        assert_eq!(err.to_string(), "Copy source element not found: missing");
        assert!(clipboard.writes().is_empty());
    }

    #[tokio::test]
    async fn test_missing_button_after_write_is_logged() {
        let (logs, _guard) = capture();
        let mut doc = Document::new();
        doc.add_element(None, Some("license"), &[], "KEY-1");
        let document = doc.into_shared();
        let config = Arc::new(CopyConfig::default());
        let clipboard = MemoryClipboard::new();

        let task = copy_element_text(&document, &config, &clipboard, "license").unwrap();
        assert_eq!(
            task.outcome().await.unwrap(),
            CopyOutcome::ButtonMissing {
                button_id: "copy-btn-license".into()
            }
        );
        // The write itself went through
        assert_eq!(clipboard.contents().as_deref(), Some("KEY-1"));
        assert!(logs.at_level(LogLevel::Error)[0]
            .message
            .contains("copy-btn-license"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_button_mapping_wins_over_prefix() {
        let mut doc = Document::new();
        doc.add_element(None, Some("api-key"), &[], "ABC123");
        doc.add_element(None, Some("copy-btn-api-key"), &[], "Copy");
        doc.add_element(None, Some("key-copy"), &[], "Copy key");
        let document = doc.into_shared();

        let mut config = CopyConfig::default();
        config
            .buttons
            .insert("api-key".to_string(), "key-copy".to_string());
        let config = Arc::new(config);

        let clipboard = MemoryClipboard::new();
        let task = copy_element_text(&document, &config, &clipboard, "api-key").unwrap();
        task.outcome().await.unwrap();

        assert_eq!(button_text(&document, "key-copy"), "Copied!");
        assert_eq!(button_text(&document, "copy-btn-api-key"), "Copy");
    }

    /// Restore timers aren't cancelled: the second copy snapshots "Copied!"
    /// and its restore puts that back after the first restore ran.
    #[tokio::test(start_paused = true)]
    async fn test_rapid_double_copy_ends_on_feedback_text() {
        let document = page();
        let config = Arc::new(CopyConfig::default());
        let clipboard = MemoryClipboard::new();

        copy_element_text(&document, &config, &clipboard, "api-key")
            .unwrap()
            .outcome()
            .await
            .unwrap();
        sleep(Duration::from_millis(500)).await;
        copy_element_text(&document, &config, &clipboard, "api-key")
            .unwrap()
            .outcome()
            .await
            .unwrap();

        // First restore at t=2000
        sleep(Duration::from_millis(1600)).await;
        assert_eq!(button_text(&document, "copy-btn-api-key"), "Copy");

        // Second restore at t=2500
        sleep(Duration::from_millis(500)).await;
        assert_eq!(button_text(&document, "copy-btn-api-key"), "Copied!");
        assert_eq!(clipboard.writes().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_copies_rendered_text_of_subtree() {
        let mut doc = Document::new();
        let code = doc.add_element(None, Some("snippet"), &[], "curl ");
        doc.add_element(Some(code), None, &["token"], "https://example.test");
        doc.add_element(None, Some("copy-btn-snippet"), &[], "Copy");
        let document = doc.into_shared();
        let clipboard = MemoryClipboard::new();

        let config = Arc::new(CopyConfig::default());
        copy_element_text(&document, &config, &clipboard, "snippet")
            .unwrap()
            .outcome()
            .await
            .unwrap();
        assert_eq!(
            clipboard.contents().as_deref(),
            Some("curl https://example.test")
        );
    }
}
