//! Attributed node tree
//!
//! Attributes keep their document order, so an untouched subtree compares
//! equal to itself after a parse/serialize/parse cycle.

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Any node that can appear inside an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    /// Target and content between `<?` and `?>`
    ProcessingInstruction(String),
}

impl Node {
    /// The element behind this node, if it is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attribute`]
    pub fn with_attribute(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`Element::push_child`]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push_child(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn push_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Iterate over child elements, skipping text and comments
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    /// Index into `children` of the first child element with the given name
    pub fn child_position(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| matches!(c, Node::Element(el) if el.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut el = Element::new("BreakpointContent")
            .with_attribute("shouldBeEnabled", "Yes")
            .with_attribute("ignoreCount", 0);
        el.set_attribute("shouldBeEnabled", "No");

        assert_eq!(el.attribute("shouldBeEnabled"), Some("No"));
        assert_eq!(el.attributes[0].0, "shouldBeEnabled");
        assert_eq!(el.attributes.len(), 2);
    }

    #[test]
    fn test_child_lookup_skips_non_elements() {
        let el = Element::new("Bucket")
            .with_child(Node::Comment(" generated ".to_string()))
            .with_child(Element::new("Breakpoints"));

        assert_eq!(el.child_position("Breakpoints"), Some(1));
        assert!(el.child("Breakpoints").is_some());
        assert!(el.child("Missing").is_none());
        assert_eq!(el.child_elements().count(), 1);
    }
}
