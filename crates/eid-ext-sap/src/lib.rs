// crates/eid-ext-sap/src/lib.rs
// ============================================================================
// Module: eID Extensions SAP Library
// Description: Signature Activation Protocol runtime.
// Purpose: Issue and validate signed SAD tokens with audit logging.
// Dependencies: eid-ext-core, eid-ext-config, eid-ext-xml
// ============================================================================

//! ## Overview
//! An identity provider answers a `SADRequest` with a signed SAD token using
//! [`SadIssuer`]; the signing service checks the token against its own
//! request with [`SadValidator`]. Both take the current time from the caller
//! and record every outcome to a [`SadAuditSink`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod issuer;
pub mod jws;
pub mod signing;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::SadAuditEvent;
pub use audit::SadAuditSink;
pub use audit::SadFileAuditSink;
pub use audit::SadNoopAuditSink;
pub use audit::SadOutcome;
pub use audit::SadStderrAuditSink;
pub use audit::sink_from_config;
pub use issuer::IssueError;
pub use issuer::IssuedSad;
pub use issuer::SadIssueInput;
pub use issuer::SadIssuer;
pub use jws::DecodedJws;
pub use jws::JwsError;
pub use jws::JwsHeader;
pub use jws::decode_jws;
pub use jws::encode_jws;
pub use signing::ED25519_ALGORITHM;
pub use signing::Ed25519Signer;
pub use signing::Ed25519Verifier;
pub use validator::SadExpectations;
pub use validator::SadValidationError;
pub use validator::SadValidator;
