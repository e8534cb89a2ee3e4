//! Minimal owned XML element tree used for request and response bodies.
//!
//! Parsing goes through `quick-xml`'s pull reader and produces a nameless
//! document root whose children are the top-level elements of the input.
//! Whitespace-only text between elements is discarded; comments, processing
//! instructions and declarations are skipped.

use std::io;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Failures while decoding an XML body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The tokenizer rejected the input.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed {
        /// Byte offset reported by the reader.
        position: u64,
        /// Reader diagnostic.
        message: String,
    },
    /// Character data appeared outside of any element.
    #[error("character data outside of an element at byte {position}")]
    StrayText {
        /// Byte offset reported by the reader.
        position: u64,
    },
    /// Input ended with elements still open.
    #[error("element <{name}> is not closed")]
    Unclosed {
        /// Innermost open element.
        name: String,
    },
}

/// One element with its attributes, text content and child elements.
///
/// The document root is the only node with an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Element called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Nameless document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Root holding `element` as its only child.
    #[must_use]
    pub fn document(element: Self) -> Self {
        Self::root().with_child(element)
    }

    /// Element name; empty for a document root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this node is a document root rather than an element.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Whether the node carries neither text nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.children.is_empty()
    }

    /// Value of attribute `name`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Sets attribute `name`, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let key = name.into();
        let text = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = text,
            None => self.attributes.push((key, text)),
        }
    }

    /// Builder form of [`XmlNode::set_attr`].
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Character data directly inside this element.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replaces the character data.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Builder form of [`XmlNode::set_text`].
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// First child element called `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Appends a child element.
    pub fn push_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Builder form of [`XmlNode::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Unwraps a document root holding exactly one element.
    #[must_use]
    pub fn into_single_element(self) -> Option<Self> {
        if !self.is_root() {
            return Some(self);
        }
        let mut children = self.children;
        if children.len() == 1 { children.pop() } else { None }
    }

    /// Parses `input` into a document root. Empty input yields an empty root.
    ///
    /// Text is kept verbatim on leaf elements. Whitespace-only text around
    /// child elements is indentation and is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] for input that is not well-formed.
    pub fn scan(input: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(false);
        let mut stack = vec![Self::root()];
        loop {
            let position = reader.buffer_position();
            let event = reader.read_event().map_err(|error| DocumentError::Malformed {
                position,
                message: error.to_string(),
            })?;
            match event {
                Event::Start(start) => stack.push(element_from(&start, position)?),
                Event::Empty(start) => {
                    let node = element_from(&start, position)?;
                    attach(&mut stack, node);
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(DocumentError::Malformed {
                            position,
                            message: "unexpected end tag".to_owned(),
                        });
                    }
                    if let Some(mut node) = stack.pop() {
                        drop_indentation(&mut node);
                        attach(&mut stack, node);
                    }
                }
                Event::Text(text) => {
                    let value = text.unescape().map_err(|error| DocumentError::Malformed {
                        position,
                        message: error.to_string(),
                    })?;
                    append_text(&mut stack, &value, position)?;
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    append_text(&mut stack, &value, position)?;
                }
                Event::Eof => break,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }
        match stack.pop() {
            Some(root) if stack.is_empty() => Ok(root),
            Some(open) => Err(DocumentError::Unclosed { name: open.name }),
            None => Ok(Self::root()),
        }
    }

    /// Serialises the node. A document root writes its children in order.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `sink`.
    pub fn write_to<W: io::Write>(&self, sink: W) -> io::Result<()> {
        let mut writer = Writer::new_with_indent(sink, b' ', 2);
        if self.is_root() {
            for child in &self.children {
                write_element(&mut writer, child)?;
            }
        } else {
            write_element(&mut writer, self)?;
        }
        writer.get_mut().write_all(b"\n")
    }

    /// Serialises the node into a string.
    #[must_use]
    pub fn to_xml_string(&self) -> String {
        let mut buffer = Vec::new();
        if self.write_to(&mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn drop_indentation(node: &mut XmlNode) {
    let layout_only = node.text.as_deref().is_some_and(|text| text.trim().is_empty());
    if layout_only && !node.children.is_empty() {
        node.text = None;
    }
}

fn element_from(start: &BytesStart<'_>, position: u64) -> Result<XmlNode, DocumentError> {
    let malformed = |message: String| DocumentError::Malformed { position, message };
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|error| malformed(error.to_string()))?
        .to_owned();
    let mut node = XmlNode::new(name);
    for entry in start.attributes() {
        let attribute = entry.map_err(|error| malformed(error.to_string()))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|error| malformed(error.to_string()))?
            .to_owned();
        let value = attribute
            .unescape_value()
            .map_err(|error| malformed(error.to_string()))?;
        node.attributes.push((key, value.into_owned()));
    }
    Ok(node)
}

fn attach(stack: &mut [XmlNode], node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn append_text(stack: &mut [XmlNode], value: &str, position: u64) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(node) if !node.is_root() => {
            node.text.get_or_insert_with(String::new).push_str(value);
            Ok(())
        }
        _ if value.trim().is_empty() => Ok(()),
        _ => Err(DocumentError::StrayText { position }),
    }
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, node: &XmlNode) -> io::Result<()> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if node.is_empty() {
        return writer.write_event(Event::Empty(start));
    }
    writer.write_event(Event::Start(start))?;
    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &node.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))
}
