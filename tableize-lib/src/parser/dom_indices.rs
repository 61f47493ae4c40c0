use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::dom_tree::{self, Document, Handle};

/// Snapshot of the element nodes of a document, taken once before any
/// mutation so that removing attributes or replacing elements never disturbs
/// iteration.
#[derive(Debug, Default)]
pub struct DomIndices {
    /// Every element, in document order.
    pub elements: Vec<Handle>,
    /// Maps a lowercase tag name (e.g., "div") to all nodes with that tag.
    pub tag_map: HashMap<String, Vec<Handle>>,
    /// Elements carrying a `class` attribute, in document order.
    pub classed: Vec<Handle>,
}

impl DomIndices {
    /// Build the indices for the entire document.
    pub fn build(document: &Document) -> Self {
        let mut indices = DomIndices::default();
        for node in dom_tree::descendant_elements(&document.root) {
            indices.index(node);
        }
        indices
    }

    fn index(&mut self, node: Handle) {
        if let Some(elem) = node.borrow().as_element() {
            self.tag_map
                .entry(elem.tag.clone())
                .or_default()
                .push(Rc::clone(&node));

            if elem.has_attribute("class") {
                self.classed.push(Rc::clone(&node));
            }
        }
        self.elements.push(node);
    }

    /// Elements with the given tag, in document order.
    pub fn by_tag(&self, tag: &str) -> &[Handle] {
        self.tag_map
            .get(&tag.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
