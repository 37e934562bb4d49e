// Backdrop click-to-dismiss
//
// Listeners are bound once, to the backdrops present at attach time. Click
// handling returns an action; the helper executes it.

use crate::config::Markers;
use crate::document::{Document, NodeId};

/// Actions returned by backdrop click handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackdropAction {
    /// Click landed on modal content (or outside any bound backdrop)
    None,
    /// Close the modal container with this id
    Close(String),
}

/// A click as seen by one listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    /// Element that was actually clicked
    pub target: NodeId,
    /// Element whose listener is running
    pub current_target: NodeId,
}

/// Click listeners attached to backdrop elements
#[derive(Debug, Clone, Default)]
pub struct BackdropBinding {
    backdrops: Vec<NodeId>,
}

impl BackdropBinding {
    /// Bind every element currently carrying the backdrop marker
    pub fn bind(doc: &Document, markers: &Markers) -> Self {
        let backdrops = doc.elements_with_class(&markers.backdrop);
        tracing::debug!(count = backdrops.len(), "Bound backdrop click listeners");
        Self { backdrops }
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.backdrops.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.backdrops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backdrops.is_empty()
    }

    /// One listener invocation: dismiss only when the backdrop itself was hit
    pub fn handle_click(
        &self,
        doc: &Document,
        markers: &Markers,
        event: ClickEvent,
    ) -> BackdropAction {
        // Identity, not containment: clicks on content bubble up but don't count
        if event.target != event.current_target {
            return BackdropAction::None;
        }

        let Some(container) = doc.closest(event.current_target, &markers.container) else {
            tracing::trace!("Backdrop has no modal container ancestor");
            return BackdropAction::None;
        };

        match doc.element(container).and_then(|e| e.id.clone()) {
            Some(id) if !id.is_empty() => BackdropAction::Close(id),
            _ => BackdropAction::None,
        }
    }

    /// Dispatch a click at `target`, bubbling through its ancestors
    ///
    /// Every bound backdrop on the path gets the event, innermost first.
    pub fn dispatch(
        &self,
        doc: &Document,
        markers: &Markers,
        target: NodeId,
    ) -> Vec<BackdropAction> {
        doc.ancestors(target)
            .into_iter()
            .filter(|node| self.is_bound(*node))
            .map(|current_target| {
                self.handle_click(
                    doc,
                    markers,
                    ClickEvent {
                        target,
                        current_target,
                    },
                )
            })
            .filter(|action| *action != BackdropAction::None)
            .collect()
    }
}
