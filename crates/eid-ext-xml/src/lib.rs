// crates/eid-ext-xml/src/lib.rs
// ============================================================================
// Module: eID Extensions XML Library
// Description: XML text bridge for the eID extension element tree.
// Purpose: Parse and write extension elements with quick-xml.
// Dependencies: eid-ext-core, quick-xml, thiserror
// ============================================================================

//! ## Overview
//! The core codecs operate on [`eid_ext_core::Element`]. This crate converts
//! between that tree and XML text, treating all input as untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod codec;
pub mod reader;
pub mod writer;

// ============================================================================
// SECTION: Imports
// ============================================================================

use eid_ext_core::PrincipalSelectionError;
use eid_ext_core::SadRequestError;
use thiserror::Error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use codec::principal_selection_from_xml;
pub use codec::principal_selection_to_xml;
pub use codec::requested_principal_selection_from_xml;
pub use codec::requested_principal_selection_to_xml;
pub use codec::sad_request_from_xml;
pub use codec::sad_request_to_xml;
pub use reader::XmlLimits;
pub use reader::parse_element;
pub use reader::parse_element_with_limits;
pub use writer::write_element;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by the XML bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// The input is not well-formed XML.
    #[error("xml parse error: {0}")]
    Parse(String),
    /// Serialization failed.
    #[error("xml write error: {0}")]
    Write(String),
    /// The input declares a document type.
    #[error("xml doctype declarations are not allowed")]
    DoctypeForbidden,
    /// The input exceeds the size limit.
    #[error("xml input of {size} bytes exceeds limit of {limit}")]
    TooLarge {
        /// Input size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// The input nests deeper than allowed.
    #[error("xml nesting exceeds depth limit of {limit}")]
    TooDeep {
        /// Configured depth limit.
        limit: usize,
    },
    /// The document structure is invalid.
    #[error("invalid xml structure: {0}")]
    Structure(&'static str),
    /// The SAD request element is invalid.
    #[error(transparent)]
    SadRequest(#[from] SadRequestError),
    /// The principal selection element is invalid.
    #[error(transparent)]
    PrincipalSelection(#[from] PrincipalSelectionError),
}
