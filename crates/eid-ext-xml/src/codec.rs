// crates/eid-ext-xml/src/codec.rs
// ============================================================================
// Module: Extension XML Codec
// Description: XML text entry points for the extension element codecs.
// Purpose: Compose the XML bridge with the core element codecs.
// Dependencies: eid-ext-core
// ============================================================================

//! ## Overview
//! Convenience functions that parse XML text and decode it with the core
//! codecs, or encode a value and write it as XML text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use eid_ext_core::PrincipalSelection;
use eid_ext_core::RequestedPrincipalSelection;
use eid_ext_core::SadRequest;

use crate::XmlError;
use crate::reader::XmlLimits;
use crate::reader::parse_element_with_limits;
use crate::writer::write_element;

// ============================================================================
// SECTION: SAD Requests
// ============================================================================

/// Parses and decodes a `SADRequest` document.
///
/// # Errors
///
/// Returns [`XmlError`] when the XML is malformed or the request is invalid.
pub fn sad_request_from_xml(xml: &str, limits: XmlLimits) -> Result<SadRequest, XmlError> {
    let element = parse_element_with_limits(xml, limits)?;
    Ok(SadRequest::decode(&element)?)
}

/// Encodes a SAD request as XML text.
///
/// # Errors
///
/// Returns [`XmlError::Write`] when serialization fails.
pub fn sad_request_to_xml(request: &SadRequest) -> Result<String, XmlError> {
    write_element(&request.encode())
}

// ============================================================================
// SECTION: Principal Selection
// ============================================================================

/// Parses and decodes a `PrincipalSelection` document.
///
/// # Errors
///
/// Returns [`XmlError`] when the XML is malformed or the selection is invalid.
pub fn principal_selection_from_xml(
    xml: &str,
    limits: XmlLimits,
) -> Result<PrincipalSelection, XmlError> {
    let element = parse_element_with_limits(xml, limits)?;
    Ok(PrincipalSelection::decode(&element)?)
}

/// Encodes a principal selection as XML text.
///
/// # Errors
///
/// Returns [`XmlError::Write`] when serialization fails.
pub fn principal_selection_to_xml(selection: &PrincipalSelection) -> Result<String, XmlError> {
    write_element(&selection.encode())
}

/// Parses and decodes a `RequestedPrincipalSelection` document.
///
/// # Errors
///
/// Returns [`XmlError`] when the XML is malformed or the selection is invalid.
pub fn requested_principal_selection_from_xml(
    xml: &str,
    limits: XmlLimits,
) -> Result<RequestedPrincipalSelection, XmlError> {
    let element = parse_element_with_limits(xml, limits)?;
    Ok(RequestedPrincipalSelection::decode(&element)?)
}

/// Encodes a requested principal selection as XML text.
///
/// # Errors
///
/// Returns [`XmlError::Write`] when serialization fails.
pub fn requested_principal_selection_to_xml(
    selection: &RequestedPrincipalSelection,
) -> Result<String, XmlError> {
    write_element(&selection.encode())
}
