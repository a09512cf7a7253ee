//! In-memory document model.
//!
//! An ordered collection of top-level elements, enough document for hosts
//! without a real DOM and for exercising the merge algorithm headless.

use super::markup;
use super::types::{DocumentModel, Element};

#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Element>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from a markup string; each top-level element
    /// becomes one node, text between elements is dropped.
    pub fn from_markup(html: &str) -> Self {
        Self {
            nodes: markup::parse_elements(html),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.nodes.push(element);
    }

    pub fn nodes(&self) -> &[Element] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutable access to an element by identifier, e.g. for attribute
    /// write-backs on anchors.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.nodes.iter_mut().find(|n| n.id() == Some(id))
    }
}

impl DocumentModel for MemoryDocument {
    fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.nodes.iter().find(|n| n.id() == Some(id))
    }

    fn replace_by_id(&mut self, id: &str, replacement: Element) -> bool {
        match self.nodes.iter().position(|n| n.id() == Some(id)) {
            Some(index) => {
                self.nodes[index] = replacement;
                true
            }
            None => false,
        }
    }
}
