//! Abstract XML element model shared by the request builder and the
//! response decoder, plus the serializer, parser, and flattener.

mod flatten;
mod reader;
mod writer;

pub use flatten::{DecodedMapping, flatten, mapping_to_json};
pub use reader::parse;
pub use writer::to_xml;

/// A single node of an XML document: name, optional text content, ordered
/// attributes, and ordered children.
///
/// Order is significant throughout — the gateway protocol encodes field
/// order positionally, and the flattener's disambiguation counters follow
/// document order. Names keep their namespace prefix as written
/// (`soap:Body`, `xsi:type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element name, including any namespace prefix.
    pub name: String,
    /// Text content, if any.
    pub text: Option<String>,
    /// Attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an element with no text, attributes, or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element holding the given text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.text = Some(text.into());
        element
    }

    /// Adds an attribute, builder style.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Adds an attribute in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    /// Appends a child unconditionally.
    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Appends a child only if it is non-empty.
    ///
    /// This is how whole groups get omitted: build the group bottom-up, then
    /// attach it — an empty group simply never appears in the document.
    pub fn attach(&mut self, child: Self) {
        if !child.is_empty() {
            self.children.push(child);
        }
    }

    /// Appends a text child named `name` only when `value` is non-empty.
    pub fn push_text_if_set(&mut self, name: &str, value: &str) {
        if !value.is_empty() {
            self.children.push(Self::with_text(name, value));
        }
    }

    /// True when the element carries no text, no attributes, and no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().is_none_or(str::is_empty)
            && self.attributes.is_empty()
            && self.children.is_empty()
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follows a chain of first-child lookups.
    #[must_use]
    pub fn descendant(&self, path: &[&str]) -> Option<&Self> {
        let mut current = self;
        for name in path {
            current = current.child(name)?;
        }
        Some(current)
    }

    /// Returns the value of the named attribute.
    #[must_use]
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v.as_str()))
    }

    /// Returns the text content, or the empty string when there is none.
    #[must_use]
    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element_is_empty() {
        assert!(Element::new("Account").is_empty());
    }

    #[test]
    fn test_attribute_makes_element_non_empty() {
        let element = Element::new("Account").attr("registration", "abc123");
        assert!(!element.is_empty());
    }

    #[test]
    fn test_attach_drops_empty_child() {
        let mut parent = Element::new("Transaction");
        parent.attach(Element::new("Identification"));
        assert!(parent.children.is_empty());
    }

    #[test]
    fn test_attach_keeps_populated_child() {
        let mut parent = Element::new("Transaction");
        let mut group = Element::new("Identification");
        group.push_text_if_set("TransactionID", "tx-1");
        parent.attach(group);
        assert_eq!(parent.children.len(), 1);
    }

    #[test]
    fn test_push_text_if_set_skips_empty_value() {
        let mut parent = Element::new("Name");
        parent.push_text_if_set("Given", "");
        parent.push_text_if_set("Family", "Doe");
        assert!(parent.child("Given").is_none());
        assert_eq!(parent.child("Family").map(Element::text_content), Some("Doe"));
    }

    #[test]
    fn test_descendant_lookup() {
        let mut processing = Element::new("Processing");
        processing.push(Element::with_text("Result", "ACK"));
        let mut transaction = Element::new("Transaction");
        transaction.push(processing);
        let mut root = Element::new("Response");
        root.push(transaction);

        let result = root.descendant(&["Transaction", "Processing", "Result"]);
        assert_eq!(result.map(Element::text_content), Some("ACK"));
        assert!(root.descendant(&["Transaction", "Payment"]).is_none());
    }
}
