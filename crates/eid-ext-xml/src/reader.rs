// crates/eid-ext-xml/src/reader.rs
// ============================================================================
// Module: XML Reader
// Description: Namespace-resolving XML parser producing element trees.
// Purpose: Turn untrusted XML text into an [`Element`] under hard limits.
// Dependencies: eid-ext-core, quick-xml
// ============================================================================

//! ## Overview
//! Parsing resolves every element prefix to its namespace URI, rejects
//! document type declarations, and enforces size and depth limits before any
//! tree is returned. Namespace declaration attributes are consumed, not kept,
//! and so are attributes in a foreign namespace (`x:hint`): the tree holds
//! only unqualified attributes plus the always-bound `xml:` ones.
//!
//! Text handling:
//! - `<a/>` yields `text == None`.
//! - `<a></a>` yields `text == Some("")`.
//! - Whitespace-only text inside an element with children is dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use eid_ext_core::Attribute;
use eid_ext_core::Element;
use eid_ext_core::QualifiedName;
use quick_xml::NsReader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;

use crate::XmlError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum XML input size in bytes.
pub const DEFAULT_MAX_XML_BYTES: usize = 256 * 1024;
/// Default maximum element nesting depth.
pub const DEFAULT_MAX_XML_DEPTH: usize = 32;
/// Prefix bound to the XML namespace in every document.
pub(crate) const XML_PREFIX: &[u8] = b"xml";

/// Input limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlLimits {
    /// Maximum input size in bytes.
    pub max_bytes: usize,
    /// Maximum element nesting depth (the root is depth 1).
    pub max_depth: usize,
}

impl Default for XmlLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_XML_BYTES,
            max_depth: DEFAULT_MAX_XML_DEPTH,
        }
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses an XML document into its root element using default limits.
///
/// # Errors
///
/// Returns [`XmlError`] when the document is malformed or exceeds limits.
pub fn parse_element(xml: &str) -> Result<Element, XmlError> {
    parse_element_with_limits(xml, XmlLimits::default())
}

/// Parses an XML document into its root element.
///
/// # Errors
///
/// Returns [`XmlError`] when the document is malformed, declares a DOCTYPE,
/// or exceeds `limits`.
pub fn parse_element_with_limits(xml: &str, limits: XmlLimits) -> Result<Element, XmlError> {
    if xml.len() > limits.max_bytes {
        return Err(XmlError::TooLarge {
            size: xml.len(),
            limit: limits.max_bytes,
        });
    }
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) =
            reader.read_resolved_event().map_err(|err| XmlError::Parse(err.to_string()))?;
        match event {
            Event::Start(start) => {
                ensure_open_allowed(&stack, root.as_ref(), limits)?;
                stack.push(open_element(resolved, &start)?);
            }
            Event::Empty(start) => {
                ensure_open_allowed(&stack, root.as_ref(), limits)?;
                let element = open_element(resolved, &start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or(XmlError::Structure("unbalanced end tag"))?;
                finish_text(&mut element);
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(|err| XmlError::Parse(err.to_string()))?;
                append_text(&mut stack, &value)?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                append_text(&mut stack, utf8(&bytes)?)?;
            }
            Event::DocType(_) => return Err(XmlError::DoctypeForbidden),
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Structure("unclosed element"));
    }
    root.ok_or(XmlError::Structure("document has no root element"))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects a second root element and nesting beyond the depth limit.
fn ensure_open_allowed(
    stack: &[Element],
    root: Option<&Element>,
    limits: XmlLimits,
) -> Result<(), XmlError> {
    if root.is_some() {
        return Err(XmlError::Structure("multiple root elements"));
    }
    if stack.len() >= limits.max_depth {
        return Err(XmlError::TooDeep {
            limit: limits.max_depth,
        });
    }
    Ok(())
}

/// Builds an element from a start tag and its resolved namespace.
fn open_element(resolved: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let namespace = match resolved {
        ResolveResult::Bound(namespace) => Some(utf8(namespace.as_ref())?.to_string()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(XmlError::Parse(format!(
                "unbound namespace prefix: {}",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };
    let name = start.name();
    let prefix = match name.prefix() {
        Some(prefix) => Some(utf8(prefix.as_ref())?.to_string()),
        None => None,
    };
    let mut element = Element::new(QualifiedName {
        namespace,
        prefix,
        local: utf8(name.local_name().as_ref())?.to_string(),
    });
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| XmlError::Parse(err.to_string()))?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        if attribute.key.prefix().is_some_and(|prefix| prefix.as_ref() != XML_PREFIX) {
            continue;
        }
        let value =
            attribute.unescape_value().map_err(|err| XmlError::Parse(err.to_string()))?;
        element.attributes.push(Attribute {
            name: utf8(attribute.key.as_ref())?.to_string(),
            value: value.into_owned(),
        });
    }
    Ok(element)
}

/// Attaches a completed element to its parent, or makes it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

/// Appends character data to the open element.
fn append_text(stack: &mut [Element], value: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(top) => {
            top.text.get_or_insert_with(String::new).push_str(value);
            Ok(())
        }
        None if value.trim().is_empty() => Ok(()),
        None => Err(XmlError::Structure("text outside the root element")),
    }
}

/// Normalizes text once an element closes.
fn finish_text(element: &mut Element) {
    if element.children.is_empty() {
        if element.text.is_none() {
            element.text = Some(String::new());
        }
    } else if element.text.as_deref().is_some_and(|text| text.trim().is_empty()) {
        element.text = None;
    }
}

/// Decodes UTF-8 bytes from the parser.
fn utf8(bytes: &[u8]) -> Result<&str, XmlError> {
    std::str::from_utf8(bytes).map_err(|err| XmlError::Parse(err.to_string()))
}
