// crates/eid-ext-sap/src/signing.rs
// ============================================================================
// Module: Ed25519 Signing
// Description: Ed25519 implementations of the SAD signing boundary.
// Purpose: Sign and strictly verify compact SAD tokens.
// Dependencies: ed25519-dalek, eid-ext-core
// ============================================================================

//! ## Overview
//! Tokens are signed with `EdDSA` over Ed25519. Verification uses
//! `verify_strict`, which rejects small-order keys and malleable signatures.
//! A verifier bound to a key id rejects tokens naming a different key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use ed25519_dalek::Signature;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use eid_ext_core::SadSigner;
use eid_ext_core::SadVerifier;
use eid_ext_core::SigningError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JWS algorithm name for Ed25519 signatures.
pub const ED25519_ALGORITHM: &str = "EdDSA";

// ============================================================================
// SECTION: Signer
// ============================================================================

/// Signs tokens with an Ed25519 secret key.
pub struct Ed25519Signer {
    /// Secret signing key.
    key: SigningKey,
    /// Key identifier announced in token headers.
    key_id: Option<String>,
}

impl Ed25519Signer {
    /// Creates a signer from a 32-byte secret key.
    #[must_use]
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(secret),
            key_id: None,
        }
    }

    /// Sets the key identifier announced in token headers.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Returns a verifier for this signer's public key.
    #[must_use]
    pub fn verifier(&self) -> Ed25519Verifier {
        Ed25519Verifier {
            key: self.key.verifying_key(),
            key_id: self.key_id.clone(),
        }
    }
}

impl SadSigner for Ed25519Signer {
    fn algorithm(&self) -> &str {
        ED25519_ALGORITHM
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, SigningError> {
        let signature = self
            .key
            .try_sign(signing_input)
            .map_err(|err| SigningError::SigningFailed(err.to_string()))?;
        Ok(signature.to_bytes().to_vec())
    }
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Verifies tokens against one Ed25519 public key.
#[derive(Debug, Clone)]
pub struct Ed25519Verifier {
    /// Public verification key.
    key: VerifyingKey,
    /// Key identifier tokens must name, when set.
    key_id: Option<String>,
}

impl Ed25519Verifier {
    /// Creates a verifier from a 32-byte public key.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::UnknownKey`] when the bytes are not a valid
    /// public key.
    pub fn from_public_bytes(public: &[u8]) -> Result<Self, SigningError> {
        let bytes: [u8; 32] = public
            .try_into()
            .map_err(|_| SigningError::UnknownKey("public key must be 32 bytes".to_string()))?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|_| SigningError::UnknownKey("invalid ed25519 public key".to_string()))?;
        Ok(Self {
            key,
            key_id: None,
        })
    }

    /// Requires tokens to name `key_id` in their header.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }
}

impl SadVerifier for Ed25519Verifier {
    fn verify(
        &self,
        algorithm: &str,
        key_id: Option<&str>,
        signing_input: &[u8],
        signature: &[u8],
    ) -> Result<(), SigningError> {
        if algorithm != ED25519_ALGORITHM {
            return Err(SigningError::UnsupportedAlgorithm(algorithm.to_string()));
        }
        if let Some(expected) = &self.key_id
            && key_id != Some(expected.as_str())
        {
            return Err(SigningError::UnknownKey(key_id.unwrap_or("<none>").to_string()));
        }
        let signature = Signature::try_from(signature)
            .map_err(|_| SigningError::InvalidSignature("invalid signature bytes".to_string()))?;
        self.key.verify_strict(signing_input, &signature).map_err(|_| {
            SigningError::InvalidSignature("signature verification failed".to_string())
        })
    }
}
