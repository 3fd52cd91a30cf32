// crates/eid-ext-sap/src/jws.rs
// ============================================================================
// Module: Compact JWS
// Description: Compact JSON Web Signature encoding for SAD tokens.
// Purpose: Wrap canonical SAD payloads in a signed, URL-safe token.
// Dependencies: base64, eid-ext-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Tokens have the form `base64url(header).base64url(payload).base64url(sig)`
//! without padding. The header is written as canonical JSON so the signing
//! input is stable. Decoding enforces a size limit before any base64 or JSON
//! work and keeps the exact signing input for verification.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use eid_ext_core::HashError;
use eid_ext_core::SadSigner;
use eid_ext_core::SadVerifier;
use eid_ext_core::SigningError;
use eid_ext_core::hashing::canonical_json_bytes;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Header
// ============================================================================

/// Token type written into every header.
pub const JWT_TYPE: &str = "JWT";

/// Protected JWS header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    /// Signature algorithm.
    pub alg: String,
    /// Key identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Token type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl JwsHeader {
    /// Builds the header announced by `signer`.
    #[must_use]
    pub fn for_signer(signer: &dyn SadSigner) -> Self {
        Self {
            alg: signer.algorithm().to_string(),
            kid: signer.key_id().map(str::to_string),
            typ: Some(JWT_TYPE.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while encoding or decoding compact tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwsError {
    /// The token exceeds the configured size limit.
    #[error("token of {size} bytes exceeds limit of {limit}")]
    TooLarge {
        /// Token size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// The token is not a well-formed compact JWS.
    #[error("malformed token: {0}")]
    Malformed(String),
    /// The header does not match the signer or the verifier.
    #[error("header mismatch: {0}")]
    HeaderMismatch(String),
    /// Signing or verification failed.
    #[error(transparent)]
    Signing(#[from] SigningError),
    /// Canonical header serialization failed.
    #[error(transparent)]
    Canonicalization(#[from] HashError),
}

// ============================================================================
// SECTION: Encoding
// ============================================================================

/// Signs `payload` and returns the compact token.
///
/// # Errors
///
/// Returns [`JwsError::HeaderMismatch`] when `header` names a different
/// algorithm than `signer`, or a signing error from the signer.
pub fn encode_jws(
    header: &JwsHeader,
    payload: &[u8],
    signer: &dyn SadSigner,
) -> Result<String, JwsError> {
    if header.alg != signer.algorithm() {
        return Err(JwsError::HeaderMismatch(format!(
            "header alg {} does not match signer alg {}",
            header.alg,
            signer.algorithm()
        )));
    }
    let header_bytes = canonical_json_bytes(header)?;
    let mut token = URL_SAFE_NO_PAD.encode(header_bytes);
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(payload));
    let signature = signer.sign(token.as_bytes())?;
    token.push('.');
    token.push_str(&URL_SAFE_NO_PAD.encode(signature));
    Ok(token)
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Parsed compact token whose signature has not been checked yet.
#[derive(Debug, Clone)]
pub struct DecodedJws {
    /// Protected header.
    header: JwsHeader,
    /// Decoded payload bytes.
    payload: Vec<u8>,
    /// Exact signing input (`header.payload` as transmitted).
    signing_input: String,
    /// Decoded signature bytes.
    signature: Vec<u8>,
}

impl DecodedJws {
    /// Returns the protected header.
    #[must_use]
    pub const fn header(&self) -> &JwsHeader {
        &self.header
    }

    /// Returns the payload bytes. Only trust them after [`Self::verify`].
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Verifies the signature with `verifier`.
    ///
    /// # Errors
    ///
    /// Returns [`JwsError::Signing`] when the verifier rejects the token.
    pub fn verify(&self, verifier: &dyn SadVerifier) -> Result<(), JwsError> {
        verifier.verify(
            &self.header.alg,
            self.header.kid.as_deref(),
            self.signing_input.as_bytes(),
            &self.signature,
        )?;
        Ok(())
    }
}

/// Splits and decodes a compact token without verifying it.
///
/// # Errors
///
/// Returns [`JwsError::TooLarge`] when the token exceeds `max_bytes`, or
/// [`JwsError::Malformed`] when the structure, base64, or header is invalid.
pub fn decode_jws(token: &str, max_bytes: usize) -> Result<DecodedJws, JwsError> {
    if token.len() > max_bytes {
        return Err(JwsError::TooLarge {
            size: token.len(),
            limit: max_bytes,
        });
    }
    let mut parts = token.split('.');
    let (Some(header_part), Some(payload_part), Some(signature_part), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(JwsError::Malformed("expected three dot-separated segments".to_string()));
    };
    let header_bytes = decode_segment("header", header_part)?;
    let header: JwsHeader = serde_json::from_slice(&header_bytes)
        .map_err(|err| JwsError::Malformed(format!("header: {err}")))?;
    if header.typ.as_deref().is_some_and(|typ| typ != JWT_TYPE) {
        return Err(JwsError::Malformed("unexpected token type".to_string()));
    }
    let payload = decode_segment("payload", payload_part)?;
    let signature = decode_segment("signature", signature_part)?;
    if signature.is_empty() {
        return Err(JwsError::Malformed("empty signature".to_string()));
    }
    Ok(DecodedJws {
        header,
        payload,
        signing_input: format!("{header_part}.{payload_part}"),
        signature,
    })
}

/// Decodes one base64url segment.
fn decode_segment(label: &str, segment: &str) -> Result<Vec<u8>, JwsError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|err| JwsError::Malformed(format!("{label} encoding: {err}")))
}
