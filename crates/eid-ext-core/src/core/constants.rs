// crates/eid-ext-core/src/core/constants.rs
// ============================================================================
// Module: Protocol Constants
// Description: Namespaces, element names, and attribute names.
// Purpose: Keep protocol identifiers in one place.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Namespace URIs and preferred prefixes for the extensions handled by this
//! crate, plus the attribute names commonly used to identify a signer.
//! Attribute names are open-ended; the ones listed here are conveniences, not
//! a closed registry.

// ============================================================================
// SECTION: Namespaces
// ============================================================================

/// Signature Activation Protocol namespace.
pub const SAP_NAMESPACE: &str = "http://id.elegnamnden.se/csig/1.1/sap/ns";
/// Preferred prefix for the SAP namespace.
pub const SAP_PREFIX: &str = "sap";
/// Principal Selection namespace.
pub const PRINCIPAL_SELECTION_NAMESPACE: &str =
    "http://id.swedenconnect.se/authn/1.0/principal-selection/ns";
/// Preferred prefix for the Principal Selection namespace.
pub const PRINCIPAL_SELECTION_PREFIX: &str = "psc";

// ============================================================================
// SECTION: Attribute Name Formats
// ============================================================================

/// SAML URI attribute name format, the default for match values.
pub const NAME_FORMAT_URI: &str = "urn:oasis:names:tc:SAML:2.0:attrname-format:uri";

// ============================================================================
// SECTION: Attribute Names
// ============================================================================

/// Swedish personal identity number.
pub const ATTRIBUTE_PERSONAL_IDENTITY_NUMBER: &str = "urn:oid:1.2.752.29.4.13";
/// Swedish personal identity number mapped from an eIDAS identity.
pub const ATTRIBUTE_MAPPED_PERSONAL_IDENTITY_NUMBER: &str = "urn:oid:1.2.752.201.3.16";
/// Provisional identifier.
pub const ATTRIBUTE_PRID: &str = "urn:oid:1.2.752.201.3.4";
/// eIDAS person identifier.
pub const ATTRIBUTE_EIDAS_PERSON_IDENTIFIER: &str = "urn:oid:1.2.752.201.3.7";
/// Organizational affiliation.
pub const ATTRIBUTE_ORG_AFFILIATION: &str = "urn:oid:1.2.752.201.3.1";
