//! Document node type and the live-document seam.
//!
//! The runtime never touches a real browser document directly. It goes
//! through [`DocumentModel`], which exposes the two operations the merge
//! algorithm needs: find an element by identifier and replace it in place.
//! Hosts with a real DOM implement the trait against it; everything else
//! (including the tests) uses [`MemoryDocument`](crate::dom::MemoryDocument).
//!
//! Unexpected document state is never an error on this side of the seam:
//! a lookup that finds nothing is answered with `None`, a replace that
//! finds no target reports `false`, and the caller skips on.

/// A parsed markup element: tag name, attributes, and raw inner markup.
///
/// Attribute names and tag names are stored lowercased. Attribute order
/// is preserved from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    inner_html: String,
}

impl Element {
    /// Creates an empty element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            inner_html: String::new(),
        }
    }

    pub(crate) fn from_parts(tag: String, attrs: Vec<(String, String)>) -> Self {
        Self {
            tag,
            attrs,
            inner_html: String::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style inner-markup setter.
    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The `id` attribute, if present. May be empty; merge eligibility
    /// additionally requires it to be non-empty.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Looks up an attribute value by (lowercase) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    /// Sets an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub(crate) fn set_inner_html(&mut self, html: &str) {
        self.inner_html = html.to_string();
    }
}

/// The live document as the merge algorithm sees it.
pub trait DocumentModel {
    /// Finds the element with the given identifier, if any.
    fn find_by_id(&self, id: &str) -> Option<&Element>;

    /// Replaces the element with the given identifier in place, keeping
    /// its document position. Returns `false` when no element matches.
    fn replace_by_id(&mut self, id: &str, replacement: Element) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_lookup_and_set() {
        let mut el = Element::new("div").with_attr("id", "t");
        assert_eq!(el.id(), Some("t"));
        assert_eq!(el.attr("class"), None);

        el.set_attr("class", "card");
        assert_eq!(el.attr("class"), Some("card"));

        el.set_attr("class", "card wide");
        assert_eq!(el.attr("class"), Some("card wide"));
        assert_eq!(el.attr("id"), Some("t"));
    }

    #[test]
    fn test_names_are_lowercased() {
        let el = Element::new("DIV").with_attr("ID", "t");
        assert_eq!(el.tag(), "div");
        assert_eq!(el.id(), Some("t"));
    }

    #[test]
    fn test_boolean_attr_is_present_with_empty_value() {
        let el = Element::new("div").with_attr("hx-swap-oob", "");
        assert!(el.has_attr("hx-swap-oob"));
        assert_eq!(el.attr("hx-swap-oob"), Some(""));
    }
}
