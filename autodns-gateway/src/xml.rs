//! XML codec for the gateway wire format
//!
//! Requests and responses are handled as an ordered tree of named values
//! instead of fixed serde structs, because the gateway schema is
//! presence-sensitive and its responses carry operation-specific payloads.
//!
//! # Tree conventions
//! - An element with neither children nor attributes is [`XmlValue::Text`].
//! - A child name that occurs once maps to a single value; a repeated child
//!   name collapses into an [`XmlValue::List`].
//! - Attributes live in a child node named [`ATTRIBUTES_KEY`], text next to
//!   child elements under [`TEXT_KEY`].

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{GatewayError, Result};

/// Key under which element attributes are stored.
pub const ATTRIBUTES_KEY: &str = "$";
/// Key under which element text is stored when the element also has children.
pub const TEXT_KEY: &str = "_";

/// A value in the XML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// Element text content.
    Text(String),
    /// Element with named children.
    Node(XmlNode),
    /// Repeated sibling elements sharing one name.
    List(Vec<XmlValue>),
}

impl XmlValue {
    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Child node, if this is a node value.
    pub fn as_node(&self) -> Option<&XmlNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The first element of a list, or the value itself.
    pub fn first(&self) -> Option<&XmlValue> {
        match self {
            Self::List(items) => items.first(),
            other => Some(other),
        }
    }
}

impl From<String> for XmlValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for XmlValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<u32> for XmlValue {
    fn from(number: u32) -> Self {
        Self::Text(number.to_string())
    }
}

impl From<bool> for XmlValue {
    fn from(flag: bool) -> Self {
        Self::Text(flag.to_string())
    }
}

impl From<XmlNode> for XmlValue {
    fn from(node: XmlNode) -> Self {
        Self::Node(node)
    }
}

impl<T: Into<XmlValue>> From<Vec<T>> for XmlValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// An element's children in document (or insertion) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    entries: Vec<(String, XmlValue)>,
}

impl XmlNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child and returns the node, for building trees inline.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<XmlValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Appends a child only when `value` is present.
    #[must_use]
    pub fn with_opt<V: Into<XmlValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<XmlValue>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&XmlValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Text of the first child named `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)?.first()?.as_text()
    }

    /// First child node named `name`.
    pub fn node(&self, name: &str) -> Option<&XmlNode> {
        self.get(name)?.first()?.as_node()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &XmlValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============ Writer ============

fn serialization_error(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::SerializationError {
        detail: e.to_string(),
    }
}

/// Renders `value` as a compact XML document with root element `root`.
pub fn to_string(root: &str, value: &XmlValue) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(serialization_error)?;
    write_element(&mut writer, root, value)?;
    String::from_utf8(writer.into_inner()).map_err(serialization_error)
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &XmlValue) -> Result<()> {
    match value {
        XmlValue::Text(text) if text.is_empty() => writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(serialization_error),
        XmlValue::Text(text) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(serialization_error)?;
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(serialization_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(serialization_error)
        }
        XmlValue::List(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        XmlValue::Node(node) => write_node(writer, name, node),
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, name: &str, node: &XmlNode) -> Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(attributes) = node.node(ATTRIBUTES_KEY) {
        for (key, value) in attributes.iter() {
            if let Some(text) = value.as_text() {
                start.push_attribute((key, text));
            }
        }
    }

    let mut children = node.iter().filter(|(key, _)| *key != ATTRIBUTES_KEY).peekable();
    if children.peek().is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialization_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialization_error)?;
    for (key, value) in children {
        if key == TEXT_KEY {
            if let Some(text) = value.as_text() {
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(serialization_error)?;
            }
        } else {
            write_element(writer, key, value)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(serialization_error)
}

// ============ Parser ============

fn parse_error(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::ParseError {
        detail: e.to_string(),
    }
}

/// An element whose end tag has not been read yet.
struct OpenElement {
    name: String,
    attributes: XmlNode,
    children: Vec<(String, XmlValue)>,
    text: String,
}

impl OpenElement {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut attributes = XmlNode::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(parse_error)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(parse_error)?;
            attributes.push(key, value.into_owned());
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn finish(self) -> (String, XmlValue) {
        if self.children.is_empty() && self.attributes.is_empty() {
            return (self.name, XmlValue::Text(self.text.trim().to_string()));
        }

        let mut node = XmlNode::new();
        if !self.attributes.is_empty() {
            node.push(ATTRIBUTES_KEY, self.attributes);
        }
        let text = self.text.trim();
        if !text.is_empty() {
            node.push(TEXT_KEY, text);
        }

        // Group repeated siblings, keeping the position of the first occurrence
        let mut grouped: Vec<(String, Vec<XmlValue>)> = Vec::new();
        for (key, value) in self.children {
            match grouped.iter_mut().find(|(name, _)| *name == key) {
                Some((_, values)) => values.push(value),
                None => grouped.push((key, vec![value])),
            }
        }
        for (key, mut values) in grouped {
            let value = if values.len() == 1 {
                values.swap_remove(0)
            } else {
                XmlValue::List(values)
            };
            node.push(key, value);
        }

        (self.name, XmlValue::Node(node))
    }
}

fn close(
    element: OpenElement,
    stack: &mut [OpenElement],
    root: &mut Option<(String, XmlValue)>,
) -> Result<()> {
    let (name, value) = element.finish();
    if let Some(parent) = stack.last_mut() {
        parent.children.push((name, value));
        Ok(())
    } else if root.is_none() {
        *root = Some((name, value));
        Ok(())
    } else {
        Err(parse_error(format!(
            "unexpected second root element <{name}>"
        )))
    }
}

/// Parses an XML document into its root element name and value.
pub fn parse(text: &str) -> Result<(String, XmlValue)> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(start) => stack.push(OpenElement::open(&start)?),
            Event::Empty(start) => {
                let element = OpenElement::open(&start)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error("unexpected closing tag"))?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape().map_err(parse_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| parse_error("document has no root element"))
}
