//! XML document tree
//!
//! Ordered element tree with source line attribution. Text nodes keep their
//! escaped source form, so a literal `&` in the input stays visible to the
//! lint rules and a rewritten file never double-escapes content.

use quick_xml::escape::{partial_escape, unescape};
use std::borrow::Cow;

/// Child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    /// Text in escaped (source) form
    Text(String),
    CData(String),
    Comment(String),
}

/// Element with ordered attributes and mixed children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attribute values are stored decoded
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// 1-based line of the start tag (None for synthesized elements)
    pub line: Option<u32>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            line: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Append unescaped text (escaped on the way in)
    pub fn with_text(mut self, text: &str) -> Self {
        self.children
            .push(XmlNode::Text(partial_escape(text).into_owned()));
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Tag without namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Direct element children
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(XmlNode::Element(child));
    }

    /// Concatenated direct text content, escaped form
    pub fn raw_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Concatenated direct text content, decoded (lenient: undecodable
    /// references are kept verbatim)
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(&decode_lenient(t)),
                XmlNode::CData(c) => out.push_str(c),
                _ => {}
            }
        }
        out
    }

    /// Direct text nodes in escaped form, one entry per node
    pub fn text_nodes(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Text(t) => Some(t.as_str()),
            _ => None,
        })
    }

    /// Pre-order walk including `self`
    pub fn walk(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Pre-order walk excluding `self`
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Element> = self.elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// First direct child element with the given tag
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|e| e.tag == tag)
    }

    /// First direct child `field` element with `name` equal to `name`
    pub fn field(&self, name: &str) -> Option<&Element> {
        self.elements()
            .find(|e| e.tag == "field" && e.attr("name") == Some(name))
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut()
            .find(|e| e.tag == "field" && e.attr("name") == Some(name))
    }

    /// First descendant `field` element with `name` equal to `name`
    pub fn descendant_field(&self, name: &str) -> Option<&Element> {
        self.descendants()
            .find(|e| e.tag == "field" && e.attr("name") == Some(name))
    }

    pub fn descendant_field_mut(&mut self, name: &str) -> Option<&mut Element> {
        for child in self.elements_mut() {
            if child.tag == "field" && child.attr("name") == Some(name) {
                return Some(child);
            }
            if let Some(found) = child.descendant_field_mut(name) {
                return Some(found);
            }
        }
        None
    }

    /// First element in pre-order (including `self`) accepted by `pred`
    pub fn find_mut(&mut self, pred: &mut dyn FnMut(&Element) -> bool) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        for child in self.elements_mut() {
            if let Some(found) = child.find_mut(pred) {
                return Some(found);
            }
        }
        None
    }
}

/// Pre-order element iterator
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(next.elements());
        self.stack[start..].reverse();
        Some(next)
    }
}

/// Parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Whether the source carried an XML declaration
    pub has_declaration: bool,
    /// Comments that precede the root element
    pub prolog: Vec<String>,
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            has_declaration: true,
            prolog: Vec::new(),
            root,
        }
    }

    /// Pre-order walk over every element, root first
    pub fn elements(&self) -> Descendants<'_> {
        self.root.walk()
    }
}

/// Strip a `prefix:` from a qualified name
pub fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map(|(_, local)| local).unwrap_or(qname)
}

/// Decode entity references, keeping the raw text when it does not decode
pub fn decode_lenient(raw: &str) -> Cow<'_, str> {
    unescape(raw).unwrap_or(Cow::Borrowed(raw))
}
