//! XML documents as element trees.
//!
//! The document root becomes a single-entry `Map` keyed by the root's name.
//! Below that:
//!
//! - attributes become a `Properties` block around the element's content;
//! - an element with children becomes a `Map` with one entry per child, and
//!   comments become comment entries in the same map;
//! - a leaf element's trimmed text becomes `Utf8`, or `Empty` when blank.
//!
//! Decoding accepts any value tree: lists become `item` children and scalars
//! become text.
//!
//! ```rust
//! use serde_bof::adapter::markup;
//!
//! let xml = "<note lang=\"en\"><!-- draft --><to>Tove</to><body/></note>";
//! let bytes = markup::encode_str(xml).unwrap();
//! assert_eq!(
//!     markup::decode_to_string(&bytes).unwrap(),
//!     "<note lang=\"en\">\n  <!-- draft -->\n  <to>Tove</to>\n  <body />\n</note>"
//! );
//! ```

use super::Adapter;
use crate::{Error, Result, Value};
use quick_xml::escape::{escape, partial_escape, resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An XML element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Character data directly inside the element, as written.
    pub text: Option<String>,
}

/// A child of an [`Element`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Comment(String),
}

impl Element {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Element::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.children.push(Node::Comment(comment.into()));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }
}

/// Adapter between [`Element`] trees and [`Value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkupAdapter;

impl Adapter for MarkupAdapter {
    type Tree = Element;

    fn encode_from(&self, root: &Element) -> Result<Value> {
        Ok(Value::Map(vec![(
            Value::Utf8(root.name.clone()),
            element_content(root),
        )]))
    }

    fn decode_into(&self, value: Value) -> Result<Element> {
        let entries = match value.into_annotated() {
            Value::Map(entries) => entries,
            other => {
                return Err(Error::markup(format!(
                    "document root must be a map, found {}",
                    other.kind()
                )))
            }
        };
        let mut elements = entries
            .into_iter()
            .filter(|(key, _)| !key.annotated().is_comment());
        match (elements.next(), elements.next()) {
            (Some((key, content)), None) => {
                let mut root = Element::new(element_name(key)?);
                fill_element(&mut root, content)?;
                Ok(root)
            }
            _ => Err(Error::markup("document root must hold exactly one element")),
        }
    }
}

fn element_content(element: &Element) -> Value {
    let body = if !element.children.is_empty() {
        Value::Map(
            element
                .children
                .iter()
                .map(|child| match child {
                    Node::Element(e) => (Value::Utf8(e.name.clone()), element_content(e)),
                    Node::Comment(c) => (Value::Comment(c.clone()), Value::Empty),
                })
                .collect(),
        )
    } else {
        match element.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Value::Utf8(text.to_string()),
            _ => Value::Empty,
        }
    };
    if element.attributes.is_empty() {
        return body;
    }
    Value::Properties {
        entries: element
            .attributes
            .iter()
            .map(|(k, v)| (Value::Utf8(k.clone()), Value::Utf8(v.clone())))
            .collect(),
        value: Box::new(body),
    }
}

fn fill_element(element: &mut Element, value: Value) -> Result<()> {
    let mut current = value;
    while let Value::Properties { entries, value } = current {
        for (key, value) in entries {
            if key.annotated().is_comment() {
                continue;
            }
            let name = scalar_text(&key, "an attribute name")?;
            let text = scalar_text(&value, "an attribute value")?;
            element.attributes.push((name, text));
        }
        current = *value;
    }

    match current {
        Value::Map(entries) => {
            for (key, value) in entries {
                match key.into_annotated() {
                    Value::Comment(c) => element.children.push(Node::Comment(c)),
                    key => {
                        let mut child = Element::new(element_name(key)?);
                        fill_element(&mut child, value)?;
                        element.children.push(Node::Element(child));
                    }
                }
            }
        }
        Value::List(items) | Value::UniformList { items, .. } => {
            for item in items {
                let mut child = Element::new("item");
                fill_element(&mut child, item)?;
                element.children.push(Node::Element(child));
            }
        }
        Value::Comment(c) => element.children.push(Node::Comment(c)),
        Value::Empty => {}
        scalar => element.text = Some(scalar_text(&scalar, "element text")?),
    }
    Ok(())
}

fn element_name(key: Value) -> Result<String> {
    let name = scalar_text(&key, "an element name")?;
    if name.is_empty() {
        return Err(Error::markup("element name cannot be empty"));
    }
    Ok(name)
}

fn scalar_text(value: &Value, what: &str) -> Result<String> {
    match value.annotated() {
        v @ (Value::List(_) | Value::UniformList { .. } | Value::Map(_) | Value::Comment(_)) => Err(
            Error::unsupported(format!("{} cannot be used as {}", v.kind(), what)),
        ),
        v => v
            .to_text()
            .ok_or_else(|| Error::unsupported(format!("{} has no text form", v.kind()))),
    }
}

/// Parses an XML document, keeping comments inside the root element.
///
/// Entities are resolved and CDATA sections are read as text. The
/// declaration, processing instructions and the doctype are ignored.
///
/// # Errors
///
/// Returns [`Error::Markup`] for malformed XML, unknown entities, or a
/// document without exactly one root element.
pub fn parse_document(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::markup(format!("{} at byte {}", e, reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::markup("closing tag without an open element"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let raw = std::str::from_utf8(&e).map_err(Error::markup)?;
                let text = unescape(raw).map_err(Error::markup)?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e).map_err(Error::markup)?;
                push_text(&mut stack, text)?;
            }
            Event::GeneralRef(e) => {
                let name = std::str::from_utf8(&e).map_err(Error::markup)?;
                let resolved = resolve_reference(name)?;
                push_text(&mut stack, &resolved)?;
            }
            Event::Comment(e) => {
                let text = std::str::from_utf8(&e).map_err(Error::markup)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(text.to_string()));
                }
            }
            Event::Eof => break,
            // declaration, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::markup(format!("element <{}> is never closed", open.name)));
    }
    root.ok_or_else(|| Error::markup("document has no root element"))
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(Error::markup)?
        .to_string();
    let mut element = Element::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(Error::markup)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(Error::markup)?;
        let raw = std::str::from_utf8(attr.value.as_ref()).map_err(Error::markup)?;
        let value = unescape(raw).map_err(Error::markup)?;
        element.attributes.push((key.to_string(), value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::markup("document has more than one root element")),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(element) => element.push_text(text),
        None if text.trim().is_empty() => {}
        None => return Err(Error::markup("character data outside the root element")),
    }
    Ok(())
}

fn resolve_reference(name: &str) -> Result<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        };
        return code
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| Error::markup(format!("invalid character reference &{};", name)));
    }
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| Error::markup(format!("unknown entity &{};", name)))
}

/// Renders an element tree as XML, indenting nested lines by 2 spaces.
///
/// Leaf elements without text are written self-closing. There is no XML
/// declaration and no trailing newline.
#[must_use]
pub fn write_document(root: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    let text = element.text.as_deref().unwrap_or("");
    if element.children.is_empty() {
        if text.is_empty() {
            out.push_str(" />");
        } else {
            out.push('>');
            out.push_str(&partial_escape(text));
            close_tag(out, &element.name);
        }
        return;
    }

    out.push('>');
    out.push_str(&partial_escape(text.trim()));
    for child in &element.children {
        newline(out, depth + 1);
        match child {
            Node::Element(e) => write_element(out, e, depth + 1),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
        }
    }
    newline(out, depth);
    close_tag(out, &element.name);
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Parses XML text and encodes it.
///
/// # Errors
///
/// Returns [`Error::Markup`] if the text is not a well-formed document.
pub fn encode_str(text: &str) -> Result<Vec<u8>> {
    let root = parse_document(text)?;
    MarkupAdapter.encode_tree(&root)
}

/// Decodes bytes and renders them as indented XML.
///
/// # Errors
///
/// Returns an error if the bytes do not decode or the root is not a map with
/// exactly one element entry.
pub fn decode_to_string(data: &[u8]) -> Result<String> {
    let root = MarkupAdapter.decode_tree(data)?;
    Ok(write_document(&root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    #[test]
    fn test_encode_layout() {
        let root = Element::new("r")
            .with_attribute("id", "7")
            .with_comment(" c ")
            .with_child(Element::new("a").with_text("  hi  "))
            .with_child(Element::new("b").with_text(" \n "));
        assert_eq!(
            MarkupAdapter.encode_from(&root).unwrap(),
            Value::Map(vec![(
                Value::from("r"),
                Value::Properties {
                    entries: vec![(Value::from("id"), Value::from("7"))],
                    value: Box::new(Value::Map(vec![
                        (Value::Comment(" c ".into()), Value::Empty),
                        (Value::from("a"), Value::from("hi")),
                        (Value::from("b"), Value::Empty),
                    ])),
                },
            )])
        );
    }

    #[test]
    fn test_text_ignored_when_children_present() {
        let root = Element::new("r")
            .with_text("loose")
            .with_child(Element::new("a"));
        assert_eq!(
            MarkupAdapter.encode_from(&root).unwrap(),
            Value::Map(vec![(
                Value::from("r"),
                Value::Map(vec![(Value::from("a"), Value::Empty)])
            )])
        );
    }

    #[test]
    fn test_parse_entities_cdata_and_comments() {
        let root = parse_document(
            "<?xml version=\"1.0\"?>\n<r t=\"a&amp;b\"><x>1 &lt; 2 &#65;</x><![CDATA[<raw>]]><!--n--></r>",
        )
        .unwrap();
        assert_eq!(root.attributes, vec![("t".to_string(), "a&b".to_string())]);
        assert_eq!(
            root.children[0],
            Node::Element(Element::new("x").with_text("1 < 2 A"))
        );
        assert_eq!(root.text.as_deref(), Some("<raw>"));
        assert_eq!(root.children[1], Node::Comment("n".into()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_document("<a><b></a>"), Err(Error::Markup(_))));
        assert!(matches!(parse_document("<a/><b/>"), Err(Error::Markup(_))));
        assert!(matches!(parse_document(""), Err(Error::Markup(_))));
        assert!(matches!(parse_document("<a>"), Err(Error::Markup(_))));
        assert!(matches!(parse_document("<a>&nope;</a>"), Err(Error::Markup(_))));
    }

    #[test]
    fn test_decode_lists_and_scalars() {
        let value = Value::Map(vec![(
            Value::from("data"),
            Value::Map(vec![
                (
                    Value::from("nums"),
                    Value::uniform(Kind::Real, vec![Value::Real(1.0), Value::Real(0.25)]).unwrap(),
                ),
                (Value::from("raw"), Value::Bytes(vec![0xab, 0x01])),
                (Value::from("flag"), Value::Bool(true)),
            ]),
        )]);
        let root = MarkupAdapter.decode_into(value).unwrap();
        assert_eq!(
            write_document(&root),
            "<data>\n  <nums>\n    <item>1.0</item>\n    <item>0.25</item>\n  </nums>\n  \
             <raw>ab01</raw>\n  <flag>true</flag>\n</data>"
        );
    }

    #[test]
    fn test_decode_scalar_attribute_values() {
        let value = Value::Map(vec![(
            Value::from("e"),
            Value::Properties {
                entries: vec![(Value::from("n"), Value::from(-4))],
                value: Box::new(Value::Empty),
            },
        )]);
        let root = MarkupAdapter.decode_into(value).unwrap();
        assert_eq!(root, Element::new("e").with_attribute("n", "-4"));
    }

    #[test]
    fn test_root_must_be_single_element() {
        let two = Value::Map(vec![
            (Value::from("a"), Value::Empty),
            (Value::from("b"), Value::Empty),
        ]);
        assert!(matches!(MarkupAdapter.decode_into(two), Err(Error::Markup(_))));
        assert!(matches!(
            MarkupAdapter.decode_into(Value::List(vec![])),
            Err(Error::Markup(_))
        ));
    }

    #[test]
    fn test_escaping_on_write() {
        let root = Element::new("r")
            .with_attribute("q", "say \"hi\"")
            .with_text("a < b & c");
        assert_eq!(
            write_document(&root),
            "<r q=\"say &quot;hi&quot;\">a &lt; b &amp; c</r>"
        );
    }

    #[test]
    fn test_document_round_trip() {
        let xml = "<catalog>\n  <book id=\"1\">\n    <title>Rust</title>\n    <!-- used -->\n    <price>9.5</price>\n  </book>\n  <book id=\"2\" />\n</catalog>";
        let bytes = encode_str(xml).unwrap();
        assert_eq!(decode_to_string(&bytes).unwrap(), xml);
    }
}
