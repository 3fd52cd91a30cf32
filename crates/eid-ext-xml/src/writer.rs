// crates/eid-ext-xml/src/writer.rs
// ============================================================================
// Module: XML Writer
// Description: Serializes element trees to XML text.
// Purpose: Emit well-formed, namespace-complete markup for extension elements.
// Dependencies: eid-ext-core, quick-xml
// ============================================================================

//! ## Overview
//! Each element is written with its preferred prefix. A namespace
//! declaration is emitted only when the prefix is not already bound to the
//! same URI by an ancestor. Elements without children and without text are
//! written as empty tags; an empty-string text yields an explicit open/close
//! pair so the reader can tell the two apart. A prefixed attribute name
//! must use a prefix already in scope (or `xml`), otherwise writing fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use eid_ext_core::Element;
use quick_xml::Writer;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;

use crate::XmlError;
use crate::reader::XML_PREFIX;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Namespace binding in scope while writing.
struct Binding {
    /// Bound prefix; `None` for the default namespace.
    prefix: Option<String>,
    /// Namespace URI; empty when the default namespace is undeclared.
    namespace: String,
}

// ============================================================================
// SECTION: Writing
// ============================================================================

/// Serializes an element tree to XML text without an XML declaration.
///
/// # Errors
///
/// Returns [`XmlError::Write`] when the writer fails.
pub fn write_element(element: &Element) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    let mut scope = Vec::new();
    write_node(&mut writer, element, &mut scope)?;
    String::from_utf8(writer.into_inner()).map_err(|err| XmlError::Write(err.to_string()))
}

/// Writes one element and its subtree.
fn write_node(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    scope: &mut Vec<Binding>,
) -> Result<(), XmlError> {
    let prefix = element.name.prefix.as_deref().filter(|prefix| !prefix.is_empty());
    let qname = match (&element.name.namespace, prefix) {
        (Some(_), Some(prefix)) => format!("{prefix}:{}", element.name.local),
        _ => element.name.local.clone(),
    };
    let mut start = BytesStart::new(qname.as_str());
    let mut declared = 0;

    match &element.name.namespace {
        Some(namespace) => {
            if bound_namespace(scope, prefix) != Some(namespace.as_str()) {
                let key = prefix.map_or_else(|| "xmlns".to_string(), |p| format!("xmlns:{p}"));
                start.push_attribute((key.as_str(), namespace.as_str()));
                scope.push(Binding {
                    prefix: prefix.map(str::to_string),
                    namespace: namespace.clone(),
                });
                declared += 1;
            }
        }
        None => {
            if bound_namespace(scope, None).is_some_and(|namespace| !namespace.is_empty()) {
                start.push_attribute(("xmlns", ""));
                scope.push(Binding {
                    prefix: None,
                    namespace: String::new(),
                });
                declared += 1;
            }
        }
    }
    for attribute in &element.attributes {
        if let Some((prefix, _)) = attribute.name.split_once(':')
            && prefix.as_bytes() != XML_PREFIX
            && bound_namespace(scope, Some(prefix)).is_none_or(str::is_empty)
        {
            return Err(XmlError::Write(format!("unbound attribute prefix: {prefix}")));
        }
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        emit(writer, Event::Empty(start))?;
    } else {
        emit(writer, Event::Start(start))?;
        if let Some(text) = element.text.as_deref().filter(|text| !text.is_empty()) {
            emit(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in &element.children {
            write_node(writer, child, scope)?;
        }
        emit(writer, Event::End(BytesEnd::new(qname.as_str())))?;
    }

    scope.truncate(scope.len() - declared);
    Ok(())
}

/// Returns the namespace currently bound to `prefix`.
fn bound_namespace<'a>(scope: &'a [Binding], prefix: Option<&str>) -> Option<&'a str> {
    scope
        .iter()
        .rev()
        .find(|binding| binding.prefix.as_deref() == prefix)
        .map(|binding| binding.namespace.as_str())
}

/// Writes one event.
fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer.write_event(event).map_err(|err| XmlError::Write(err.to_string()))
}
