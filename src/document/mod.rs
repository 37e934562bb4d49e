//! In-memory page document
//!
//! A deliberately small element tree: ids, class lists, text, parent links,
//! and the body's overflow style. Everything the helper does goes through
//! lookups on this tree, resolved fresh on every call.

mod spec;

pub use spec::{ElementSnapshot, PageSnapshot, PageSpec};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Document shared between the helper and its async continuations.
/// Never hold the lock across an `.await`.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Lock a shared document, recovering from poisoning
pub fn lock(document: &SharedDocument) -> MutexGuard<'_, Document> {
    document.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to an element inside a [`Document`]
///
/// Handles stay valid after the element is removed; lookups simply stop
/// returning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Tree edits the document refuses
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Node {0:?} does not belong to this document")]
    UnknownNode(NodeId),
    /// The move would make `child` its own ancestor
    #[error("Cannot move {child:?} under {parent:?}: it would contain itself")]
    Hierarchy { parent: NodeId, child: NodeId },
}

/// A single element
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub id: Option<String>,
    /// Class list in insertion order, no duplicates
    pub classes: Vec<String>,
    /// Own text content (children contribute their own)
    pub text: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// False once removed from the tree
    attached: bool,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// The page: a forest of elements hanging off an implicit body
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Element>,
    /// Top-level elements (children of body)
    roots: Vec<NodeId>,
    /// `document.body.style.overflow`; `None` means unset
    body_overflow: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a [`SharedDocument`]
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    /// Create an element and attach it under `parent` (or the body)
    ///
    /// With an unknown `parent` the element is created detached.
    pub fn create_element(&mut self, parent: Option<NodeId>) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(Element::default());
        if let Err(e) = self.append_child(parent, node) {
            tracing::warn!("Element created detached: {}", e);
        }
        node
    }

    /// Builder-style helper: create an element with id, classes and text
    pub fn add_element(
        &mut self,
        parent: Option<NodeId>,
        id: Option<&str>,
        classes: &[&str],
        text: &str,
    ) -> NodeId {
        let node = self.create_element(parent);
        let el = &mut self.nodes[node.0];
        el.id = id.map(str::to_string);
        el.text = text.to_string();
        for class in classes {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
        node
    }

    /// Move `child` under `parent` (or the body), detaching it from where it was
    ///
    /// Moving a node under itself or one of its descendants is refused and
    /// leaves the tree untouched.
    pub fn append_child(
        &mut self,
        parent: Option<NodeId>,
        child: NodeId,
    ) -> Result<(), DocumentError> {
        if self.element(child).is_none() {
            return Err(DocumentError::UnknownNode(child));
        }
        if let Some(p) = parent {
            if self.element(p).is_none() {
                return Err(DocumentError::UnknownNode(p));
            }
            if self.ancestors(p).contains(&child) {
                return Err(DocumentError::Hierarchy { parent: p, child });
            }
        }

        self.unlink(child);
        match parent {
            Some(p) => self.nodes[p.0].children.push(child),
            None => self.roots.push(child),
        }
        self.nodes[child.0].parent = parent;
        let attached = parent.map_or(true, |p| self.nodes[p.0].attached);
        self.set_attached(child, attached);
        Ok(())
    }

    /// Remove an element (and its subtree) from the page
    pub fn remove(&mut self, node: NodeId) {
        if self.element(node).is_none() {
            return;
        }
        self.unlink(node);
        self.nodes[node.0].parent = None;
        self.set_attached(node, false);
    }

    fn unlink(&mut self, node: NodeId) {
        match self.nodes[node.0].parent {
            Some(p) => self.nodes[p.0].children.retain(|&c| c != node),
            None => self.roots.retain(|&c| c != node),
        }
    }

    fn set_attached(&mut self, node: NodeId, attached: bool) {
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            self.nodes[n.0].attached = attached;
            stack.extend(self.nodes[n.0].children.iter().copied());
        }
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.attached)
    }

    /// Attached elements in document (pre-)order
    fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            order.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        order
    }

    /// First attached element with this id, in document order
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.walk()
            .into_iter()
            .find(|n| self.nodes[n.0].id.as_deref() == Some(id))
    }

    /// All attached elements carrying `class`, in document order
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|n| self.nodes[n.0].has_class(class))
            .collect()
    }

    /// The node itself followed by its ancestors, innermost first
    ///
    /// Empty for a node this document doesn't know.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.element(node).map(|_| node);
        while let Some(n) = current {
            chain.push(n);
            current = self.nodes[n.0].parent;
        }
        chain
    }

    /// Nearest ancestor-or-self carrying `class`
    pub fn closest(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.ancestors(node)
            .into_iter()
            .find(|n| self.nodes[n.0].has_class(class))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_some_and(|e| e.has_class(class))
    }

    /// Add a class; no-op if already present
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            if !el.has_class(class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.nodes.get_mut(node.0) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Rendered text of the subtree (own text, then children in order)
    pub fn inner_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack: Vec<NodeId> = self.element(node).map(|_| node).into_iter().collect();
        while let Some(n) = stack.pop() {
            out.push_str(&self.nodes[n.0].text);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }

    /// Replace the element's content with plain text, dropping children
    pub fn set_inner_text(&mut self, node: NodeId, text: &str) {
        if self.element(node).is_none() {
            return;
        }
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
            self.set_attached(child, false);
        }
        self.nodes[node.0].text = text.to_string();
    }

    pub fn body_overflow(&self) -> Option<&str> {
        self.body_overflow.as_deref()
    }

    pub fn set_body_overflow(&mut self, value: Option<String>) {
        self.body_overflow = value.filter(|v| !v.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modal_page() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let container = doc.add_element(None, Some("settings"), &["modal-container", "hidden"], "");
        let backdrop = doc.add_element(Some(container), None, &["modal-overlay"], "");
        let content = doc.add_element(Some(backdrop), Some("content"), &[], "Body text");
        (doc, container, backdrop, content)
    }

    #[test]
    fn test_get_element_by_id_ignores_removed() {
        let (mut doc, container, _, content) = modal_page();
        assert_eq!(doc.get_element_by_id("content"), Some(content));

        doc.remove(container);
        assert_eq!(doc.get_element_by_id("content"), None);
        assert_eq!(doc.get_element_by_id("settings"), None);
        assert!(!doc.is_attached(content));
    }

    #[test]
    fn test_empty_id_never_matches() {
        let mut doc = Document::new();
        doc.add_element(None, Some(""), &[], "");
        assert_eq!(doc.get_element_by_id(""), None);
    }

    #[test]
    fn test_closest_includes_self() {
        let (doc, container, backdrop, content) = modal_page();
        assert_eq!(doc.closest(content, "modal-container"), Some(container));
        assert_eq!(doc.closest(container, "modal-container"), Some(container));
        assert_eq!(doc.closest(backdrop, "missing"), None);
    }

    #[test]
    fn test_class_list_is_a_set() {
        let (mut doc, container, _, _) = modal_page();
        doc.add_class(container, "flex");
        doc.add_class(container, "flex");
        assert_eq!(
            doc.element(container).unwrap().classes,
            vec!["modal-container", "hidden", "flex"]
        );

        doc.remove_class(container, "hidden");
        doc.remove_class(container, "hidden");
        assert!(!doc.has_class(container, "hidden"));
    }

    #[test]
    fn test_inner_text_concatenates_subtree_in_order() {
        let mut doc = Document::new();
        let code = doc.add_element(None, Some("key"), &[], "ABC");
        doc.add_element(Some(code), None, &[], "12");
        doc.add_element(Some(code), None, &[], "3");
        assert_eq!(doc.inner_text(code), "ABC123");

        doc.set_inner_text(code, "Copied!");
        assert_eq!(doc.inner_text(code), "Copied!");
        assert!(doc.element(code).unwrap().children.is_empty());
    }

    #[test]
    fn test_body_overflow_empty_means_unset() {
        let mut doc = Document::new();
        doc.set_body_overflow(Some("hidden".into()));
        assert_eq!(doc.body_overflow(), Some("hidden"));
        doc.set_body_overflow(Some(String::new()));
        assert_eq!(doc.body_overflow(), None);
    }

    #[test]
    fn test_elements_with_class_document_order() {
        let mut doc = Document::new();
        let a = doc.add_element(None, None, &["modal-overlay"], "");
        let b = doc.add_element(Some(a), None, &["modal-overlay"], "");
        let c = doc.add_element(None, None, &["modal-overlay"], "");
        assert_eq!(doc.elements_with_class("modal-overlay"), vec![a, b, c]);
    }

    #[test]
    fn test_append_child_refuses_cycles() {
        let mut doc = Document::new();
        let a = doc.add_element(None, Some("a"), &[], "A");
        let b = doc.add_element(Some(a), Some("b"), &[], "B");

        assert_eq!(
            doc.append_child(Some(b), a),
            Err(DocumentError::Hierarchy { parent: b, child: a })
        );
        assert_eq!(
            doc.append_child(Some(a), a),
            Err(DocumentError::Hierarchy { parent: a, child: a })
        );

        // Tree untouched and still walkable
        assert_eq!(doc.element(a).unwrap().parent, None);
        assert_eq!(doc.ancestors(b), vec![b, a]);
        assert_eq!(doc.get_element_by_id("b"), Some(b));
        assert_eq!(doc.inner_text(a), "AB");
    }

    #[test]
    fn test_append_child_moves_between_parents() {
        let mut doc = Document::new();
        let a = doc.add_element(None, None, &[], "");
        let b = doc.add_element(None, None, &[], "");
        let leaf = doc.add_element(Some(a), Some("leaf"), &[], "");

        doc.append_child(Some(b), leaf).unwrap();
        assert!(doc.element(a).unwrap().children.is_empty());
        assert_eq!(doc.ancestors(leaf), vec![leaf, b]);

        doc.remove(b);
        doc.append_child(None, b).unwrap();
        assert_eq!(doc.get_element_by_id("leaf"), Some(leaf));
    }

    #[test]
    fn test_foreign_node_is_ignored() {
        let mut other = Document::new();
        for _ in 0..5 {
            other.create_element(None);
        }
        let foreign = other.create_element(None);

        let (mut doc, container, _, _) = modal_page();
        let before = doc.snapshot();

        doc.add_class(foreign, "flex");
        doc.remove_class(foreign, "hidden");
        doc.set_inner_text(foreign, "x");
        doc.remove(foreign);
        assert!(doc.ancestors(foreign).is_empty());
        assert_eq!(doc.closest(foreign, "modal-container"), None);
        assert_eq!(doc.inner_text(foreign), "");
        assert_eq!(
            doc.append_child(Some(container), foreign),
            Err(DocumentError::UnknownNode(foreign))
        );
        assert_eq!(
            doc.append_child(Some(foreign), container),
            Err(DocumentError::UnknownNode(foreign))
        );

        assert_eq!(doc.snapshot(), before);
    }
}
