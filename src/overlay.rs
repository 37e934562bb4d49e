//! Overlay visibility as a pure state transition
//!
//! `transition` looks at the document, the current page state and an action,
//! and returns the new state plus the DOM effects to apply. Nothing is
//! mutated until `apply` runs, so the logic is testable without a page.
//!
//! Scroll suppression is a single flag on the body, not a counter: closing
//! any overlay restores scrolling even while another one is still open.

use crate::config::Markers;
use crate::document::{Document, NodeId};

/// Page-level state the overlays share
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    /// Body overflow is set to the scroll-lock value
    pub scroll_suppressed: bool,
}

impl PageState {
    /// Read the state off the document (no caching between calls)
    pub fn read(doc: &Document, markers: &Markers) -> Self {
        Self {
            scroll_suppressed: doc.body_overflow() == Some(markers.scroll_lock.as_str()),
        }
    }
}

/// What the caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    Open(String),
    Close(String),
}

impl OverlayAction {
    pub fn id(&self) -> &str {
        match self {
            OverlayAction::Open(id) | OverlayAction::Close(id) => id,
        }
    }
}

/// A single DOM mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEffect {
    AddClass { node: NodeId, class: String },
    RemoveClass { node: NodeId, class: String },
    /// `None` clears the overflow style
    SetBodyOverflow(Option<String>),
}

/// Result of a transition: new state plus effects, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: PageState,
    pub effects: Vec<DomEffect>,
}

impl Transition {
    fn unchanged(state: PageState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Marker pair for a shown or hidden overlay
///
/// The hidden and visible markers only ever change together, through here.
fn visibility_effects(node: NodeId, markers: &Markers, shown: bool) -> [DomEffect; 2] {
    let hidden = markers.hidden.clone();
    let visible = markers.visible.clone();
    if shown {
        [
            DomEffect::RemoveClass { node, class: hidden },
            DomEffect::AddClass { node, class: visible },
        ]
    } else {
        [
            DomEffect::AddClass { node, class: hidden },
            DomEffect::RemoveClass { node, class: visible },
        ]
    }
}

/// Compute the effects of `action`; a missing element is a no-op
pub fn transition(
    doc: &Document,
    markers: &Markers,
    state: PageState,
    action: &OverlayAction,
) -> Transition {
    let Some(node) = doc.get_element_by_id(action.id()) else {
        tracing::trace!(modal_id = action.id(), "No overlay with this id, ignoring");
        return Transition::unchanged(state);
    };

    let (shown, overflow) = match action {
        OverlayAction::Open(_) => (true, Some(markers.scroll_lock.clone())),
        OverlayAction::Close(_) => (false, None),
    };

    let mut effects = visibility_effects(node, markers, shown).to_vec();
    effects.push(DomEffect::SetBodyOverflow(overflow));

    Transition {
        state: PageState {
            scroll_suppressed: shown,
        },
        effects,
    }
}

/// Apply effects to the document in order
pub fn apply(doc: &mut Document, effects: &[DomEffect]) {
    for effect in effects {
        match effect {
            DomEffect::AddClass { node, class } => doc.add_class(*node, class),
            DomEffect::RemoveClass { node, class } => doc.remove_class(*node, class),
            DomEffect::SetBodyOverflow(value) => doc.set_body_overflow(value.clone()),
        }
    }
}

/// Read state, transition, apply. Returns the new page state.
pub fn run(doc: &mut Document, markers: &Markers, action: &OverlayAction) -> PageState {
    let state = PageState::read(doc, markers);
    let Transition { state, effects } = transition(doc, markers, state, action);
    apply(doc, &effects);
    state
}
