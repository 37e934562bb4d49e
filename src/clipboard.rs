//! Clipboard backends
//!
//! `SystemClipboard` uses the `arboard` crate for cross-platform support
//! (Windows, macOS, Linux). The clipboard handle is created fresh for each
//! write to avoid holding resources.
//!
//! `MemoryClipboard` keeps the text in process, for headless runs and tests.

use anyhow::{anyhow, Context, Result};
use arboard::Clipboard as ArboardClipboard;
use futures::future::{self, BoxFuture};
use std::sync::{Arc, Mutex, PoisonError};

/// Something text can be written to, asynchronously
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: String) -> BoxFuture<'static, Result<()>>;
}

/// Copy text to the system clipboard (blocking)
///
/// Common failure cases: no display server (headless Linux), permission denied.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = ArboardClipboard::new().context("Failed to access clipboard")?;
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;
    Ok(())
}

/// The OS clipboard
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: String) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            tokio::task::spawn_blocking(move || copy_to_clipboard(&text))
                .await
                .context("Clipboard task panicked")
                .and_then(|result| result)
        })
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: Vec<String>,
    fail_with: Option<String>,
}

/// In-process clipboard; clones share contents
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set_failure(Some(reason.into()));
        clipboard
    }

    /// Make subsequent writes fail (`Some`) or succeed (`None`)
    pub fn set_failure(&self, reason: Option<String>) {
        self.lock().fail_with = reason;
    }

    /// Current clipboard text
    pub fn contents(&self) -> Option<String> {
        self.lock().contents.clone()
    }

    /// Every successful write, oldest first
    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: String) -> BoxFuture<'static, Result<()>> {
        let mut state = self.lock();
        let result = match state.fail_with.clone() {
            Some(reason) => Err(anyhow!(reason)),
            None => {
                state.contents = Some(text.clone());
                state.writes.push(text);
                Ok(())
            }
        };
        Box::pin(future::ready(result))
    }
}
