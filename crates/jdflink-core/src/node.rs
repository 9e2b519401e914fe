// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document node contract.
//
// Every JDF/JMF model type implements [`Node`]: it can render itself as a
// detached `xmltree::Element` and rebuild itself from one.  The free
// functions below are the shared readers and writers those implementations
// are assembled from.  Lookups are by direct-child local name, so vendor
// prefixes (`caldera:Status`) are matched by their local part.
//
// Absent-vs-required semantics:
//   - an absent (or empty) optional value yields the caller's default
//   - an absent (or empty) required value is a document format error
//   - a literal "0" is a present value, never "empty"

use std::fmt::Display;

use xmltree::{Element, EmitterConfig, Namespace, XMLNode};

use crate::error::{JdfError, Result};
use crate::time;

/// A value that participates in a JDF or JMF document tree.
pub trait Node: Sized {
    /// Render this node as an element.  Never mutates the node.
    fn to_element(&self) -> Element;

    /// Rebuild a node from an element, failing on missing required data.
    fn from_element(element: &Element) -> Result<Self>;

    /// Serialize this node as a standalone UTF-8 document.
    fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        write_document(&self.to_element())
    }

    /// Serialize this node as a standalone document string.
    fn to_xml_string(&self) -> Result<String> {
        let bytes = self.to_xml_bytes()?;
        String::from_utf8(bytes).map_err(|e| JdfError::Xml(e.to_string()))
    }

    /// Parse a standalone document whose root is this node.
    fn from_xml_str(xml: &str) -> Result<Self> {
        Self::from_element(&parse_document(xml.as_bytes())?)
    }
}

// ---------------------------------------------------------------------------
// Whole-document reading and writing
// ---------------------------------------------------------------------------

/// Parse a complete document and return its root element.
pub fn parse_document(bytes: &[u8]) -> Result<Element> {
    Element::parse(bytes).map_err(|e| JdfError::Xml(e.to_string()))
}

/// Parse a complete document and check that its root has the given tag.
pub fn parse_root(bytes: &[u8], tag: &str) -> Result<Element> {
    let root = parse_document(bytes)?;
    expect_tag(&root, tag)?;
    Ok(root)
}

/// Write an element tree as an indented UTF-8 document with declaration.
pub fn write_document(element: &Element) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let config = EmitterConfig::new().perform_indent(true);
    element
        .write_with_config(&mut buf, config)
        .map_err(|e| JdfError::Xml(e.to_string()))?;
    Ok(buf)
}

/// Fail unless `element` carries the expected local name.
pub fn expect_tag(element: &Element, tag: &str) -> Result<()> {
    if element.name == tag {
        Ok(())
    } else {
        Err(JdfError::UnexpectedElement {
            expected: tag.to_owned(),
            found: element.name.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Element construction
// ---------------------------------------------------------------------------

/// Create an element bound to a namespace under the given prefix and declare
/// that binding on the element itself, so it serializes standalone.
pub fn namespaced_element(name: &str, prefix: &str, uri: &str) -> Element {
    let mut element = Element::new(name);
    element.prefix = (!prefix.is_empty()).then(|| prefix.to_owned());
    element.namespace = Some(uri.to_owned());
    declare_namespace(&mut element, prefix, uri);
    element
}

/// Add an `xmlns` / `xmlns:prefix` declaration to an element.
pub fn declare_namespace(element: &mut Element, prefix: &str, uri: &str) {
    element
        .namespaces
        .get_or_insert_with(Namespace::empty)
        .put(prefix, uri);
}

/// `<tag>text</tag>`
pub fn text_child(tag: &str, text: impl Display) -> Element {
    let mut element = Element::new(tag);
    element.children.push(XMLNode::Text(text.to_string()));
    element
}

/// Append a child element.
pub fn push_child(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

/// Append a node's element when it is set.
pub fn push_node<N: Node>(parent: &mut Element, value: Option<&N>) {
    if let Some(value) = value {
        push_child(parent, value.to_element());
    }
}

/// Append `<tag>value</tag>` when `value` is set.
pub fn push_text<T: Display>(parent: &mut Element, tag: &str, value: Option<T>) {
    if let Some(value) = value {
        push_child(parent, text_child(tag, value));
    }
}

/// Append `<tag>true|false</tag>` when `value` is set.
pub fn push_bool(parent: &mut Element, tag: &str, value: Option<bool>) {
    push_text(parent, tag, value.map(bool_text));
}

/// Append `<tag>YYYYMMDDTHHmmssZ</tag>` when `value` is set.
pub fn push_timestamp(parent: &mut Element, tag: &str, value: Option<i64>) {
    push_text(parent, tag, value.map(time::format_jdf));
}

/// Set an attribute.
pub fn set_attr(element: &mut Element, name: &str, value: impl Display) {
    element.attributes.insert(name.to_owned(), value.to_string());
}

/// Set an attribute when `value` is set.
pub fn set_opt_attr<T: Display>(element: &mut Element, name: &str, value: Option<T>) {
    if let Some(value) = value {
        set_attr(element, name, value);
    }
}

/// Wire spelling of a boolean.
pub fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

// ---------------------------------------------------------------------------
// Attribute readers
// ---------------------------------------------------------------------------

/// A non-empty attribute value.
pub fn optional_attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element
        .attributes
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// A non-empty attribute value as an owned string.
pub fn attr_string(element: &Element, name: &str) -> Option<String> {
    optional_attr(element, name).map(str::to_owned)
}

/// A non-empty attribute value, or a format error naming it.
pub fn required_attr<'a>(element: &'a Element, name: &str) -> Result<&'a str> {
    optional_attr(element, name).ok_or_else(|| JdfError::missing_attribute(&element.name, name))
}

/// An attribute parsed with `FromStr`; unparseable text is an invalid value.
pub fn parse_attr<T: std::str::FromStr>(element: &Element, name: &str) -> Result<Option<T>> {
    optional_attr(element, name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| JdfError::invalid_value(name, raw))
        })
        .transpose()
}

/// A required attribute holding a timestamp in any accepted wire format.
pub fn required_timestamp_attr(element: &Element, name: &str) -> Result<i64> {
    let raw = required_attr(element, name)?;
    time::parse_timestamp(raw).ok_or_else(|| JdfError::invalid_value(name, raw))
}

/// An optional attribute holding a timestamp in any accepted wire format.
pub fn timestamp_attr(element: &Element, name: &str) -> Result<Option<i64>> {
    optional_attr(element, name)
        .map(|raw| time::parse_timestamp(raw).ok_or_else(|| JdfError::invalid_value(name, raw)))
        .transpose()
}

// ---------------------------------------------------------------------------
// Child readers
// ---------------------------------------------------------------------------

/// The first direct child with the given local name.
pub fn child<'a>(parent: &'a Element, tag: &str) -> Option<&'a Element> {
    parent.get_child(tag)
}

/// The first direct child with the given local name, or a format error.
pub fn required_child<'a>(parent: &'a Element, tag: &str) -> Result<&'a Element> {
    child(parent, tag).ok_or_else(|| JdfError::missing_element(&parent.name, tag))
}

/// All direct children with the given local name, in document order.
pub fn children<'a>(parent: &'a Element, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    parent
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .filter(move |e| e.name == tag)
}

/// Parse the first `tag` child as a node, if present.
pub fn optional_node<N: Node>(parent: &Element, tag: &str) -> Result<Option<N>> {
    child(parent, tag).map(N::from_element).transpose()
}

/// Parse the first `tag` child as a node, failing if it is absent.
pub fn required_node<N: Node>(parent: &Element, tag: &str) -> Result<N> {
    N::from_element(required_child(parent, tag)?)
}

/// Text content of an element, `None` when it has no text.
pub fn element_text(element: &Element) -> Option<String> {
    element.get_text().map(|t| t.into_owned())
}

/// Raw text of a child, treating empty text as absent.
fn present_text(parent: &Element, tag: &str) -> Option<String> {
    child(parent, tag)
        .and_then(element_text)
        .filter(|t| !t.is_empty())
}

fn check_required<T>(value: Option<T>, parent: &Element, tag: &str, required: bool) -> Result<Option<T>> {
    if required && value.is_none() {
        Err(JdfError::missing_element(&parent.name, tag))
    } else {
        Ok(value)
    }
}

/// Text of a child element, or `default` when absent or empty.
pub fn child_text(
    parent: &Element,
    tag: &str,
    required: bool,
    default: Option<&str>,
) -> Result<Option<String>> {
    let value = present_text(parent, tag);
    let value = check_required(value, parent, tag, required)?;
    Ok(value.or_else(|| default.map(str::to_owned)))
}

/// Integer value of a child element.
///
/// Non-numeric text coerces to zero rather than failing, matching what
/// existing controllers accept on the wire.  Use [`child_i64_strict`] where
/// that leniency is unwanted.
pub fn child_i64(
    parent: &Element,
    tag: &str,
    required: bool,
    default: Option<i64>,
) -> Result<Option<i64>> {
    let value = present_text(parent, tag).map(|t| t.trim().parse::<i64>().unwrap_or(0));
    let value = check_required(value, parent, tag, required)?;
    Ok(value.or(default))
}

/// Integer value of a child element; non-numeric text is an invalid value.
pub fn child_i64_strict(
    parent: &Element,
    tag: &str,
    required: bool,
    default: Option<i64>,
) -> Result<Option<i64>> {
    let value = present_text(parent, tag)
        .map(|t| {
            t.trim()
                .parse::<i64>()
                .map_err(|_| JdfError::invalid_value(tag, t.clone()))
        })
        .transpose()?;
    let value = check_required(value, parent, tag, required)?;
    Ok(value.or(default))
}

/// Float value of a child element, with the same zero coercion as
/// [`child_i64`].
pub fn child_f64(
    parent: &Element,
    tag: &str,
    required: bool,
    default: Option<f64>,
) -> Result<Option<f64>> {
    let value = present_text(parent, tag).map(|t| t.trim().parse::<f64>().unwrap_or(0.0));
    let value = check_required(value, parent, tag, required)?;
    Ok(value.or(default))
}

/// Boolean value of a child element: exactly `"true"` is true, any other
/// present text is false, and an absent optional child keeps `default`.
pub fn child_bool(
    parent: &Element,
    tag: &str,
    required: bool,
    default: Option<bool>,
) -> Result<Option<bool>> {
    let value = present_text(parent, tag).map(|t| t == "true");
    let value = check_required(value, parent, tag, required)?;
    Ok(value.or(default))
}

/// Timestamp value of a child element, as epoch seconds.
pub fn child_timestamp(
    parent: &Element,
    tag: &str,
    required: bool,
    default: Option<i64>,
) -> Result<Option<i64>> {
    let value = present_text(parent, tag)
        .map(|t| time::parse_timestamp(&t).ok_or_else(|| JdfError::invalid_value(tag, t.clone())))
        .transpose()?;
    let value = check_required(value, parent, tag, required)?;
    Ok(value.or(default))
}
