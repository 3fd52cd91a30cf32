// crates/eid-ext-core/src/core/sad.rs
// ============================================================================
// Module: Signature Activation Data
// Description: SAD claim set and its canonical compact JSON form.
// Purpose: Bind an authentication to one sign request for a bounded time.
// Dependencies: serde, serde_json, serde_jcs, time, crate::core::{hashing, sad_request, version}
// ============================================================================

//! ## Overview
//! Signature Activation Data is a short-lived claim set issued by an identity
//! provider. It states that `subject` authenticated at a given LoA in order to
//! activate the sign request named by `extension.request_id`.
//!
//! The compact form is RFC 8785 canonical JSON, the payload a signer wraps
//! into a compact token. Claim names follow the SAP profile (`sub`, `aud`,
//! `iss`, `iat`, `exp`, `jti`, and the `seElnSadext` extension object).
//!
//! Only integer seconds are carried on the wire; structured timestamps are
//! derived on demand.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::hashing::HashError;
use crate::core::hashing::canonical_json_string;
use crate::core::sad_request::SadRequest;
use crate::core::version::VersionTag;

// ============================================================================
// SECTION: Extension Claims
// ============================================================================

/// SAD extension claim object (`seElnSadext`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SadExtension {
    /// SAD version.
    #[serde(rename = "ver")]
    pub version: VersionTag,
    /// Identifier of the authentication request this SAD responds to.
    #[serde(rename = "irt", default, skip_serializing_if = "Option::is_none")]
    pub in_response_to: Option<String>,
    /// Name of the attribute holding the subject identifier.
    #[serde(rename = "attr", default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    /// Level of Assurance URI of the authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loa: Option<String>,
    /// Sign request identifier echoed from the SAD request.
    #[serde(rename = "reqid")]
    pub request_id: String,
    /// Number of documents the SAD activates.
    #[serde(rename = "docs", default, skip_serializing_if = "Option::is_none")]
    pub number_of_documents: Option<u32>,
}

impl SadExtension {
    /// Creates an extension with the mandatory claims only.
    #[must_use]
    pub fn new(version: VersionTag, request_id: impl Into<String>) -> Self {
        Self {
            version,
            in_response_to: None,
            attribute_name: None,
            loa: None,
            request_id: request_id.into(),
            number_of_documents: None,
        }
    }
}

// ============================================================================
// SECTION: Claim Set
// ============================================================================

/// Signature Activation Data claim set.
///
/// # Invariants
/// - `expiry > issued_at`.
/// - Two values are equal iff every claim, including the extension, is equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sad {
    /// Principal identifier.
    #[serde(rename = "sub")]
    subject: String,
    /// Intended audience (signing service entity identifier).
    #[serde(rename = "aud")]
    audience: String,
    /// Issuer (identity provider entity identifier).
    #[serde(rename = "iss")]
    issuer: String,
    /// Issuance time in seconds since the epoch.
    #[serde(rename = "iat")]
    issued_at: i64,
    /// Expiry time in seconds since the epoch.
    #[serde(rename = "exp")]
    expiry: i64,
    /// Unique token identifier.
    #[serde(rename = "jti")]
    jwt_id: String,
    /// SAD extension claims.
    #[serde(rename = "seElnSadext")]
    extension: SadExtension,
}

/// Inputs for [`Sad::issue`].
#[derive(Debug, Clone)]
pub struct SadParams {
    /// Principal identifier.
    pub subject: String,
    /// Intended audience.
    pub audience: String,
    /// Issuer entity identifier.
    pub issuer: String,
    /// Issuance time in seconds since the epoch (caller clock).
    pub issued_at: i64,
    /// Lifetime in seconds; must be positive.
    pub ttl_seconds: u64,
    /// Unique token identifier.
    pub jwt_id: String,
    /// SAD extension claims.
    pub extension: SadExtension,
}

impl Sad {
    /// Creates a claim set with an explicit expiry.
    ///
    /// # Errors
    ///
    /// Returns [`SadError::InvalidTimeRange`] unless `expiry > issued_at`.
    pub fn new(
        subject: impl Into<String>,
        audience: impl Into<String>,
        issuer: impl Into<String>,
        issued_at: i64,
        expiry: i64,
        jwt_id: impl Into<String>,
        extension: SadExtension,
    ) -> Result<Self, SadError> {
        check_time_range(issued_at, expiry)?;
        Ok(Self {
            subject: subject.into(),
            audience: audience.into(),
            issuer: issuer.into(),
            issued_at,
            expiry,
            jwt_id: jwt_id.into(),
            extension,
        })
    }

    /// Creates a claim set expiring `ttl_seconds` after `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`SadError::InvalidTimeRange`] when the TTL is zero or the
    /// expiry overflows.
    pub fn issue(params: SadParams) -> Result<Self, SadError> {
        let expiry = i64::try_from(params.ttl_seconds)
            .ok()
            .and_then(|ttl| params.issued_at.checked_add(ttl))
            .ok_or_else(|| {
                SadError::InvalidTimeRange(format!(
                    "ttl {} overflows issued_at {}",
                    params.ttl_seconds, params.issued_at
                ))
            })?;
        Self::new(
            params.subject,
            params.audience,
            params.issuer,
            params.issued_at,
            expiry,
            params.jwt_id,
            params.extension,
        )
    }

    /// Returns the principal identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the intended audience.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Returns the issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the issuance time in seconds since the epoch.
    #[must_use]
    pub const fn issued_at(&self) -> i64 {
        self.issued_at
    }

    /// Returns the expiry time in seconds since the epoch.
    #[must_use]
    pub const fn expiry(&self) -> i64 {
        self.expiry
    }

    /// Returns the unique token identifier.
    #[must_use]
    pub fn jwt_id(&self) -> &str {
        &self.jwt_id
    }

    /// Returns the extension claims.
    #[must_use]
    pub const fn extension(&self) -> &SadExtension {
        &self.extension
    }

    /// Returns the expiry as a UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SadError::TimestampOutOfRange`] when the value cannot be
    /// represented.
    pub fn expiry_as_timestamp(&self) -> Result<OffsetDateTime, SadError> {
        to_timestamp(self.expiry)
    }

    /// Returns the issuance time as a UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SadError::TimestampOutOfRange`] when the value cannot be
    /// represented.
    pub fn issued_at_as_timestamp(&self) -> Result<OffsetDateTime, SadError> {
        to_timestamp(self.issued_at)
    }

    /// Returns true when this SAD echoes the request id, version, and
    /// document count of `request`.
    #[must_use]
    pub fn answers(&self, request: &SadRequest) -> bool {
        self.extension.request_id == request.sign_request_id()
            && self.extension.version == request.requested_version()
            && self.extension.number_of_documents == Some(request.document_count().get())
    }

    /// Serializes the claim set to canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SadError::Canonicalization`] when serialization fails.
    pub fn to_compact_form(&self) -> Result<String, SadError> {
        Ok(canonical_json_string(self)?)
    }

    /// Parses a claim set from its JSON form.
    ///
    /// Unknown claims are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SadError::MalformedToken`] on invalid JSON or missing
    /// mandatory claims, and [`SadError::InvalidTimeRange`] when the expiry
    /// does not follow the issuance time.
    pub fn from_compact_form(text: &str) -> Result<Self, SadError> {
        let claims: SadClaims =
            serde_json::from_str(text).map_err(|err| SadError::MalformedToken(err.to_string()))?;
        Self::new(
            claims.sub,
            claims.aud,
            claims.iss,
            claims.iat,
            claims.exp,
            claims.jti,
            claims.extension,
        )
    }
}

/// Wire form used when decoding; every mandatory claim is required here.
#[derive(Deserialize)]
struct SadClaims {
    /// Subject claim.
    sub: String,
    /// Audience claim.
    aud: String,
    /// Issuer claim.
    iss: String,
    /// Issued-at claim.
    iat: i64,
    /// Expiry claim.
    exp: i64,
    /// Token identifier claim.
    jti: String,
    /// Extension claim.
    #[serde(rename = "seElnSadext")]
    extension: SadExtension,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when building or decoding SAD.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SadError {
    /// The compact form is not valid JSON or lacks mandatory claims.
    #[error("malformed sad token: {0}")]
    MalformedToken(String),
    /// The expiry does not follow the issuance time.
    #[error("invalid sad time range: {0}")]
    InvalidTimeRange(String),
    /// A time value is outside the representable range.
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
    /// Canonical serialization failed.
    #[error(transparent)]
    Canonicalization(#[from] HashError),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Enforces `expiry > issued_at`.
fn check_time_range(issued_at: i64, expiry: i64) -> Result<(), SadError> {
    if expiry <= issued_at {
        return Err(SadError::InvalidTimeRange(format!(
            "expiry {expiry} is not after issued_at {issued_at}"
        )));
    }
    Ok(())
}

/// Converts epoch seconds to a UTC timestamp.
fn to_timestamp(seconds: i64) -> Result<OffsetDateTime, SadError> {
    OffsetDateTime::from_unix_timestamp(seconds).map_err(|_| SadError::TimestampOutOfRange(seconds))
}
