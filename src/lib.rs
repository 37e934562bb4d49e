// UI Helper - modal overlays, backdrop dismissal and copy-to-clipboard
//
// Architecture:
// - Document: in-memory element tree the helper reads and mutates
// - Overlay: pure open/close transitions producing DOM effects
// - Backdrop: click listeners bound at attach time
// - Copy: clipboard write plus transient button feedback (tokio timers)
// - Helper: the page-facing entry points tying the above together

pub mod backdrop;
pub mod clipboard;
pub mod config;
pub mod copy;
pub mod document;
pub mod helper;
pub mod logging;
pub mod overlay;
pub mod script;

pub use backdrop::{BackdropAction, BackdropBinding, ClickEvent};
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use config::Config;
pub use copy::{CopyError, CopyOutcome, CopyTask};
pub use document::{Document, DocumentError, NodeId, PageSpec, SharedDocument};
pub use helper::UiHelper;
pub use overlay::{DomEffect, OverlayAction, PageState, Transition};
