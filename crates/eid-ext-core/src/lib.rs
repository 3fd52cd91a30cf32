// crates/eid-ext-core/src/lib.rs
// ============================================================================
// Module: eID Extensions Core Library
// Description: Public API surface for the eID extension core.
// Purpose: Expose protocol value types, codecs, and the signing boundary.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! eID extensions core models the Swedish eID Framework additions to SAML
//! authentication: Signature Activation Protocol requests, Signature
//! Activation Data, Level of Assurance URIs, and principal selection. Codecs
//! work on an in-memory [`Element`] tree; XML text is handled elsewhere.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::SadSigner;
pub use interfaces::SadVerifier;
pub use interfaces::SigningError;
