// crates/eid-ext-core/src/core/mod.rs
// ============================================================================
// Module: eID Extension Core Types
// Description: Protocol value types and element codecs.
// Purpose: Provide the SAP, SAD, LoA, and principal selection models.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror, time
// ============================================================================

//! ## Overview
//! Core types are pure values: every operation either builds a new value or
//! reads the static LoA table. Nothing here performs I/O or reads the clock.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod constants;
pub mod element;
pub mod hashing;
pub mod loa;
pub mod principal_selection;
pub mod sad;
pub mod sad_request;
pub mod version;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use element::Attribute;
pub use element::Element;
pub use element::QualifiedName;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use loa::AssuranceLevel;
pub use principal_selection::MatchValue;
pub use principal_selection::PrincipalSelection;
pub use principal_selection::PrincipalSelectionBuilder;
pub use principal_selection::PrincipalSelectionError;
pub use principal_selection::RequestedPrincipalSelection;
pub use principal_selection::RequestedPrincipalSelectionBuilder;
pub use sad::Sad;
pub use sad::SadError;
pub use sad::SadExtension;
pub use sad::SadParams;
pub use sad_request::RequestParameter;
pub use sad_request::SadRequest;
pub use sad_request::SadRequestBuilder;
pub use sad_request::SadRequestError;
pub use version::VersionError;
pub use version::VersionTag;
