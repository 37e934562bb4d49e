//! Page descriptions (input) and document snapshots (output)

use super::{Document, NodeId};
use serde::{Deserialize, Serialize};

/// Element tree as described in a page file
///
/// ```json
/// { "id": "settings", "class": ["modal-container", "hidden"],
///   "children": [ { "class": ["modal-overlay"] } ] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class: Vec<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<PageSpec>,
}

/// Serializable view of one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub class: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSnapshot>,
}

/// Serializable view of the whole page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub body_overflow: Option<String>,
    pub elements: Vec<ElementSnapshot>,
}

impl Document {
    /// Build a document from top-level element descriptions
    pub fn from_spec(elements: &[PageSpec]) -> Self {
        let mut doc = Document::new();
        for spec in elements {
            doc.insert_spec(None, spec);
        }
        doc
    }

    fn insert_spec(&mut self, parent: Option<NodeId>, spec: &PageSpec) {
        let classes: Vec<&str> = spec.class.iter().map(String::as_str).collect();
        let node = self.add_element(parent, spec.id.as_deref(), &classes, &spec.text);
        for child in &spec.children {
            self.insert_spec(Some(node), child);
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            body_overflow: self.body_overflow.clone(),
            elements: self.roots.iter().map(|&n| self.snapshot_node(n)).collect(),
        }
    }

    fn snapshot_node(&self, node: NodeId) -> ElementSnapshot {
        let el = &self.nodes[node.0];
        ElementSnapshot {
            id: el.id.clone(),
            class: el.classes.clone(),
            text: el.text.clone(),
            children: el.children.iter().map(|&c| self.snapshot_node(c)).collect(),
        }
    }
}
