// crates/eid-ext-core/src/interfaces/mod.rs
// ============================================================================
// Module: eID Extension Interfaces
// Description: Signing boundary for Signature Activation Data tokens.
// Purpose: Keep key material and signature schemes outside the core.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The core produces canonical SAD payload bytes and never touches keys. A
//! [`SadSigner`] turns the token signing input into signature bytes; a
//! [`SadVerifier`] checks them on the relying side. Implementations must
//! fail closed on unknown algorithms or keys.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised at the signing boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// The token names an algorithm the verifier does not accept.
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The token names a key the verifier does not know.
    #[error("unknown signing key: {0}")]
    UnknownKey(String),
    /// Producing a signature failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),
    /// The signature does not verify.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

// ============================================================================
// SECTION: Signer
// ============================================================================

/// Produces signatures over compact token signing input.
pub trait SadSigner: Send + Sync {
    /// Returns the JWS algorithm name (for example `EdDSA`).
    fn algorithm(&self) -> &str;

    /// Returns the key identifier to place in the token header.
    fn key_id(&self) -> Option<&str> {
        None
    }

    /// Signs the token signing input.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::SigningFailed`] when no signature can be produced.
    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, SigningError>;
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Verifies signatures over compact token signing input.
pub trait SadVerifier: Send + Sync {
    /// Verifies `signature` over `signing_input`.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] when the algorithm or key is not accepted or
    /// the signature does not verify.
    fn verify(
        &self,
        algorithm: &str,
        key_id: Option<&str>,
        signing_input: &[u8],
        signature: &[u8],
    ) -> Result<(), SigningError>;
}
