// crates/eid-ext-core/src/core/principal_selection.rs
// ============================================================================
// Module: Principal Selection
// Description: Principal selection extension models, builders, and codec.
// Purpose: Declare or request the attribute that identifies the signer.
// Dependencies: thiserror, crate::core::{constants, element}
// ============================================================================

//! ## Overview
//! A signing service can tell an identity provider which principal it expects
//! (`PrincipalSelection`, with concrete values) or which identifying attribute
//! it wants released (`RequestedPrincipalSelection`, names only). Both carry
//! an ordered list of [`MatchValue`] entries.
//!
//! Builders accumulate entries and hand out frozen copies from `build`, so a
//! builder can keep growing after a build without touching earlier results.
//! In a requested selection an absent `value` and an empty `value` are
//! distinct and survive the codec. A declarative entry names a concrete
//! principal, so its value must be present and not blank.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::constants::NAME_FORMAT_URI;
use crate::core::constants::PRINCIPAL_SELECTION_NAMESPACE;
use crate::core::constants::PRINCIPAL_SELECTION_PREFIX;
use crate::core::element::Element;
use crate::core::element::QualifiedName;

// ============================================================================
// SECTION: Element Names
// ============================================================================

/// Declarative container local name.
pub const PRINCIPAL_SELECTION_ELEMENT: &str = "PrincipalSelection";
/// Request container local name.
pub const REQUESTED_PRINCIPAL_SELECTION_ELEMENT: &str = "RequestedPrincipalSelection";
/// Entry local name.
const MATCH_VALUE: &str = "MatchValue";
/// Attribute name attribute.
const NAME: &str = "Name";
/// Attribute name format attribute.
const NAME_FORMAT: &str = "NameFormat";

// ============================================================================
// SECTION: Match Values
// ============================================================================

/// One principal attribute, optionally with the value that identifies the
/// principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchValue {
    /// Attribute name.
    name: String,
    /// Attribute name format URI.
    name_format: Option<String>,
    /// Attribute value.
    value: Option<String>,
}

impl MatchValue {
    /// Creates an entry with a name only.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_format: None,
            value: None,
        }
    }

    /// Sets the name format.
    #[must_use]
    pub fn with_name_format(mut self, name_format: impl Into<String>) -> Self {
        self.name_format = Some(name_format.into());
        self
    }

    /// Sets the value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name format as given.
    #[must_use]
    pub fn name_format(&self) -> Option<&str> {
        self.name_format.as_deref()
    }

    /// Returns the name format, defaulting to the SAML URI format.
    #[must_use]
    pub fn effective_name_format(&self) -> &str {
        self.name_format.as_deref().unwrap_or(NAME_FORMAT_URI)
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Encodes the entry with the given element name.
    fn encode(&self, name: QualifiedName) -> Element {
        let mut element = Element::new(name).with_attribute(NAME, self.name.as_str());
        if let Some(name_format) = &self.name_format {
            element.set_attribute(NAME_FORMAT, name_format.as_str());
        }
        element.text.clone_from(&self.value);
        element
    }

    /// Decodes an entry element.
    fn decode(element: &Element) -> Result<Self, PrincipalSelectionError> {
        let name = element
            .attribute(NAME)
            .filter(|name| !name.trim().is_empty())
            .ok_or(PrincipalSelectionError::MissingName)?;
        Ok(Self {
            name: name.to_string(),
            name_format: element.attribute(NAME_FORMAT).map(str::to_string),
            value: element.text().map(str::to_string),
        })
    }
}

// ============================================================================
// SECTION: Declarative Selection
// ============================================================================

/// Principal selection with concrete values.
///
/// # Invariants
/// - Every entry has a non-empty name and a non-blank value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalSelection {
    /// Entries in document order.
    match_values: Vec<MatchValue>,
}

impl PrincipalSelection {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> PrincipalSelectionBuilder {
        PrincipalSelectionBuilder::default()
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn match_values(&self) -> &[MatchValue] {
        &self.match_values
    }

    /// Returns the first entry for the given attribute name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&MatchValue> {
        self.match_values.iter().find(|entry| entry.name == name)
    }

    /// Encodes the selection in the principal selection namespace.
    #[must_use]
    pub fn encode(&self) -> Element {
        self.encode_in(PRINCIPAL_SELECTION_NAMESPACE, PRINCIPAL_SELECTION_PREFIX)
    }

    /// Encodes the selection under the given namespace and prefix.
    #[must_use]
    pub fn encode_in(&self, namespace: &str, prefix: &str) -> Element {
        encode_container(PRINCIPAL_SELECTION_ELEMENT, &self.match_values, namespace, prefix)
    }

    /// Decodes a `PrincipalSelection` element.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalSelectionError`] when the root element is wrong or
    /// an entry lacks a name or value.
    pub fn decode(element: &Element) -> Result<Self, PrincipalSelectionError> {
        let match_values = decode_container(PRINCIPAL_SELECTION_ELEMENT, element)?;
        require_values(&match_values)?;
        Ok(Self {
            match_values,
        })
    }
}

/// Builder for [`PrincipalSelection`].
#[derive(Debug, Clone, Default)]
pub struct PrincipalSelectionBuilder {
    /// Provisional entries.
    match_values: Vec<MatchValue>,
}

impl PrincipalSelectionBuilder {
    /// Starts a builder seeded with a copy of `template`'s entries.
    #[must_use]
    pub fn from_template(template: &PrincipalSelection) -> Self {
        Self {
            match_values: template.match_values.clone(),
        }
    }

    /// Appends an entry with a value.
    pub fn add_match_value(
        &mut self,
        name: impl Into<String>,
        name_format: Option<&str>,
        value: impl Into<String>,
    ) -> &mut Self {
        let mut entry = MatchValue::new(name).with_value(value);
        entry.name_format = name_format.map(str::to_string);
        self.match_values.push(entry);
        self
    }

    /// Appends a prepared entry.
    pub fn push(&mut self, entry: MatchValue) -> &mut Self {
        self.match_values.push(entry);
        self
    }

    /// Returns a frozen copy of the accumulated entries.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalSelectionError`] when an entry lacks a name or value.
    pub fn build(&self) -> Result<PrincipalSelection, PrincipalSelectionError> {
        require_names(&self.match_values)?;
        require_values(&self.match_values)?;
        Ok(PrincipalSelection {
            match_values: self.match_values.clone(),
        })
    }
}

// ============================================================================
// SECTION: Requested Selection
// ============================================================================

/// Principal selection naming the wanted attributes, normally without values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedPrincipalSelection {
    /// Entries in document order.
    match_values: Vec<MatchValue>,
}

impl RequestedPrincipalSelection {
    /// Starts an empty builder.
    #[must_use]
    pub fn builder() -> RequestedPrincipalSelectionBuilder {
        RequestedPrincipalSelectionBuilder::default()
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn match_values(&self) -> &[MatchValue] {
        &self.match_values
    }

    /// Returns the first entry for the given attribute name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&MatchValue> {
        self.match_values.iter().find(|entry| entry.name == name)
    }

    /// Encodes the selection in the principal selection namespace.
    #[must_use]
    pub fn encode(&self) -> Element {
        self.encode_in(PRINCIPAL_SELECTION_NAMESPACE, PRINCIPAL_SELECTION_PREFIX)
    }

    /// Encodes the selection under the given namespace and prefix.
    #[must_use]
    pub fn encode_in(&self, namespace: &str, prefix: &str) -> Element {
        encode_container(REQUESTED_PRINCIPAL_SELECTION_ELEMENT, &self.match_values, namespace, prefix)
    }

    /// Decodes a `RequestedPrincipalSelection` element.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalSelectionError`] when the root element is wrong or
    /// an entry lacks a name.
    pub fn decode(element: &Element) -> Result<Self, PrincipalSelectionError> {
        Ok(Self {
            match_values: decode_container(REQUESTED_PRINCIPAL_SELECTION_ELEMENT, element)?,
        })
    }
}

/// Builder for [`RequestedPrincipalSelection`].
#[derive(Debug, Clone, Default)]
pub struct RequestedPrincipalSelectionBuilder {
    /// Provisional entries.
    match_values: Vec<MatchValue>,
}

impl RequestedPrincipalSelectionBuilder {
    /// Starts a builder seeded with a copy of `template`'s entries.
    #[must_use]
    pub fn from_template(template: &RequestedPrincipalSelection) -> Self {
        Self {
            match_values: template.match_values.clone(),
        }
    }

    /// Appends an entry.
    pub fn add_match_value(
        &mut self,
        name: impl Into<String>,
        name_format: Option<&str>,
        value: Option<&str>,
    ) -> &mut Self {
        let mut entry = MatchValue::new(name);
        entry.name_format = name_format.map(str::to_string);
        entry.value = value.map(str::to_string);
        self.match_values.push(entry);
        self
    }

    /// Appends a prepared entry.
    pub fn push(&mut self, entry: MatchValue) -> &mut Self {
        self.match_values.push(entry);
        self
    }

    /// Returns a frozen copy of the accumulated entries.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalSelectionError::MissingName`] when an entry has an
    /// empty name.
    pub fn build(&self) -> Result<RequestedPrincipalSelection, PrincipalSelectionError> {
        require_names(&self.match_values)?;
        Ok(RequestedPrincipalSelection {
            match_values: self.match_values.clone(),
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when building or decoding principal selections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalSelectionError {
    /// The root element has the wrong local name.
    #[error("unexpected element: expected {expected}, found {found}")]
    UnexpectedElement {
        /// Expected local name.
        expected: &'static str,
        /// Local name found.
        found: String,
    },
    /// An entry has no attribute name.
    #[error("match value without attribute name")]
    MissingName,
    /// A declarative entry has no value, or only a blank one.
    #[error("match value for {0} has no value")]
    MissingValue(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Encodes a container of match values.
fn encode_container(
    local: &str,
    match_values: &[MatchValue],
    namespace: &str,
    prefix: &str,
) -> Element {
    let root = QualifiedName::namespaced(namespace, prefix, local);
    let mut element = Element::new(root.clone());
    for entry in match_values {
        element.children.push(entry.encode(root.sibling(MATCH_VALUE)));
    }
    element
}

/// Decodes the match values of a container, skipping unknown children.
fn decode_container(
    expected: &'static str,
    element: &Element,
) -> Result<Vec<MatchValue>, PrincipalSelectionError> {
    if element.local_name() != expected {
        return Err(PrincipalSelectionError::UnexpectedElement {
            expected,
            found: element.local_name().to_string(),
        });
    }
    element.children_named(MATCH_VALUE).map(MatchValue::decode).collect()
}

/// Rejects entries with blank names.
fn require_names(match_values: &[MatchValue]) -> Result<(), PrincipalSelectionError> {
    if match_values.iter().any(|entry| entry.name.trim().is_empty()) {
        return Err(PrincipalSelectionError::MissingName);
    }
    Ok(())
}

/// Rejects entries without a non-blank value.
fn require_values(match_values: &[MatchValue]) -> Result<(), PrincipalSelectionError> {
    let blank =
        |entry: &&MatchValue| entry.value.as_deref().is_none_or(|value| value.trim().is_empty());
    match match_values.iter().find(blank) {
        Some(entry) => Err(PrincipalSelectionError::MissingValue(entry.name.clone())),
        None => Ok(()),
    }
}
