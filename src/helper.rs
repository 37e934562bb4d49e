//! The page-facing helper
//!
//! `UiHelper::attach` is the page-ready hook: it binds backdrop listeners and
//! hands back the three operations pages call (open, close, copy) plus
//! `click` for delivering clicks to the bound listeners.

use crate::backdrop::{BackdropAction, BackdropBinding};
use crate::clipboard::Clipboard;
use crate::config::{Config, CopyConfig, Markers};
use crate::copy::{self, CopyError, CopyTask};
use crate::document::{lock, NodeId, SharedDocument};
use crate::overlay::{self, OverlayAction, PageState};
use std::sync::Arc;

pub struct UiHelper {
    document: SharedDocument,
    markers: Markers,
    copy: Arc<CopyConfig>,
    clipboard: Arc<dyn Clipboard>,
    backdrops: BackdropBinding,
}

impl UiHelper {
    /// Attach to a ready page
    pub fn attach(
        document: SharedDocument,
        config: &Config,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        let backdrops = BackdropBinding::bind(&lock(&document), &config.markers);
        tracing::info!(backdrops = backdrops.len(), "UI helper attached");

        Self {
            document,
            markers: config.markers.clone(),
            copy: Arc::new(config.copy.clone()),
            clipboard,
            backdrops,
        }
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Current page state, read off the document
    pub fn page_state(&self) -> PageState {
        PageState::read(&lock(&self.document), &self.markers)
    }

    /// Show the overlay `modal_id` and suppress page scrolling
    pub fn open_modal(&self, modal_id: &str) -> PageState {
        self.run(OverlayAction::Open(modal_id.to_string()))
    }

    /// Hide the overlay `modal_id` and restore page scrolling
    pub fn close_modal(&self, modal_id: &str) -> PageState {
        self.run(OverlayAction::Close(modal_id.to_string()))
    }

    fn run(&self, action: OverlayAction) -> PageState {
        let mut doc = lock(&self.document);
        let state = overlay::run(&mut doc, &self.markers, &action);
        tracing::debug!(
            ?action,
            scroll_suppressed = state.scroll_suppressed,
            "Overlay action"
        );
        state
    }

    /// Deliver a click on `target` to the backdrop listeners
    ///
    /// Returns the ids of the modals that were closed.
    pub fn click(&self, target: NodeId) -> Vec<String> {
        let actions = self
            .backdrops
            .dispatch(&lock(&self.document), &self.markers, target);

        let mut closed = Vec::new();
        for action in actions {
            if let BackdropAction::Close(id) = action {
                self.close_modal(&id);
                closed.push(id);
            }
        }
        closed
    }

    /// Click the element with `id`; unknown ids click nothing
    pub fn click_id(&self, id: &str) -> Vec<String> {
        let target = lock(&self.document).get_element_by_id(id);
        match target {
            Some(node) => self.click(node),
            None => Vec::new(),
        }
    }

    /// Copy the text of `element_id` to the clipboard with button feedback
    ///
    /// Must be called from within a tokio runtime.
    pub fn copy_to_clipboard(&self, element_id: &str) -> Result<CopyTask, CopyError> {
        copy::copy_element_text(
            &self.document,
            &self.copy,
            self.clipboard.as_ref(),
            element_id,
        )
    }
}
