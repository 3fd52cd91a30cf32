// crates/eid-ext-sap/src/validator.rs
// ============================================================================
// Module: SAD Validator
// Description: Signing service side of the Signature Activation Protocol.
// Purpose: Verify a SAD token against the request it must answer.
// Dependencies: eid-ext-config, eid-ext-core
// ============================================================================

//! ## Overview
//! Validation runs in a fixed order and stops at the first failure:
//! size and structure, signature, claim syntax, issuer, audience, time
//! window, then the binding to the SAD request and any optional caller
//! expectations. Only a token that passes every check yields a [`Sad`].
//!
//! Time window, with `skew` from configuration:
//! - expired when `now >= exp + skew`
//! - not yet valid when `iat > now + skew`

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use eid_ext_config::EidExtConfig;
use eid_ext_core::Sad;
use eid_ext_core::SadError;
use eid_ext_core::SadRequest;
use eid_ext_core::SadVerifier;
use thiserror::Error;

use crate::audit::EVENT_SAD_VALIDATE;
use crate::audit::SadAuditEvent;
use crate::audit::SadAuditSink;
use crate::audit::SadOutcome;
use crate::jws::JwsError;
use crate::jws::decode_jws;

// ============================================================================
// SECTION: Types
// ============================================================================

/// What the signing service expects the SAD to state.
#[derive(Debug, Clone, Copy)]
pub struct SadExpectations<'a> {
    /// SAD request the token must answer.
    pub request: &'a SadRequest,
    /// Current time in seconds since the epoch.
    pub now: i64,
    /// Expected subject attribute name.
    pub subject_attribute: Option<&'a str>,
    /// Expected subject value.
    pub subject: Option<&'a str>,
    /// Expected LoA URI.
    pub loa: Option<&'a str>,
    /// Expected authentication request identifier.
    pub in_response_to: Option<&'a str>,
}

impl<'a> SadExpectations<'a> {
    /// Creates expectations binding only to `request` at time `now`.
    #[must_use]
    pub const fn new(request: &'a SadRequest, now: i64) -> Self {
        Self {
            request,
            now,
            subject_attribute: None,
            subject: None,
            loa: None,
            in_response_to: None,
        }
    }
}

/// Errors raised while validating a SAD token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SadValidationError {
    /// The token is malformed or its signature does not verify.
    #[error(transparent)]
    Token(#[from] JwsError),
    /// The payload is not a valid claim set.
    #[error(transparent)]
    Claims(#[from] SadError),
    /// No audience is configured and the request names no requester.
    #[error("no audience to validate against")]
    AudienceUnknown,
    /// A claim differs from the expected value.
    #[error("{claim} mismatch: expected {expected}, found {found}")]
    Mismatch {
        /// Claim name.
        claim: &'static str,
        /// Expected value.
        expected: String,
        /// Value carried by the token.
        found: String,
    },
    /// The token has expired.
    #[error("sad expired at {expiry}")]
    Expired {
        /// Expiry claim.
        expiry: i64,
    },
    /// The token was issued in the future.
    #[error("sad issued in the future at {issued_at}")]
    NotYetValid {
        /// Issued-at claim.
        issued_at: i64,
    },
}

impl SadValidationError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Token(JwsError::Signing(_)) => "invalid_signature",
            Self::Token(_) => "malformed_token",
            Self::Claims(_) => "invalid_claims",
            Self::AudienceUnknown => "audience_unknown",
            Self::Mismatch {
                claim, ..
            } => *claim,
            Self::Expired {
                ..
            } => "expired",
            Self::NotYetValid {
                ..
            } => "not_yet_valid",
        }
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validates signed SAD tokens.
pub struct SadValidator {
    /// Issuer the token must name.
    expected_issuer: String,
    /// Audience the token must name; falls back to the request requester.
    audience: Option<String>,
    /// Tolerated clock difference in seconds.
    clock_skew_seconds: i64,
    /// Maximum compact token size in bytes.
    max_token_bytes: usize,
    /// Signature verifier.
    verifier: Arc<dyn SadVerifier>,
    /// Audit sink.
    audit: Arc<dyn SadAuditSink>,
}

impl SadValidator {
    /// Creates a validator from validated configuration.
    #[must_use]
    pub fn new(
        config: &EidExtConfig,
        verifier: Arc<dyn SadVerifier>,
        audit: Arc<dyn SadAuditSink>,
    ) -> Self {
        Self {
            expected_issuer: config.expected_issuer().to_string(),
            audience: config.validation.audience.clone(),
            clock_skew_seconds: i64::try_from(config.validation.clock_skew_seconds)
                .unwrap_or(i64::MAX),
            max_token_bytes: config.limits.max_token_bytes,
            verifier,
            audit,
        }
    }

    /// Validates `token` and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SadValidationError`] for the first failed check.
    pub fn validate(
        &self,
        token: &str,
        expected: &SadExpectations<'_>,
    ) -> Result<Sad, SadValidationError> {
        let result = self.check(token, expected);
        let outcome = if result.is_ok() { SadOutcome::Success } else { SadOutcome::Failure };
        let mut event = SadAuditEvent::new(EVENT_SAD_VALIDATE, outcome).with_token(token);
        event.sign_request_id = Some(expected.request.sign_request_id().to_string());
        match &result {
            Ok(sad) => {
                event.jti = Some(sad.jwt_id().to_string());
                event.issuer = Some(sad.issuer().to_string());
                event.audience = Some(sad.audience().to_string());
                event.loa = sad.extension().loa.clone();
            }
            Err(err) => {
                event.issuer = Some(self.expected_issuer.clone());
                event.error_kind = Some(err.kind());
            }
        }
        self.audit.record(&event);
        result
    }

    /// Runs every check without auditing.
    fn check(&self, token: &str, expected: &SadExpectations<'_>) -> Result<Sad, SadValidationError> {
        let decoded = decode_jws(token, self.max_token_bytes)?;
        decoded.verify(self.verifier.as_ref())?;
        let payload = std::str::from_utf8(decoded.payload())
            .map_err(|err| SadError::MalformedToken(err.to_string()))?;
        let sad = Sad::from_compact_form(payload)?;

        require("iss", &self.expected_issuer, sad.issuer())?;
        let audience = self
            .audience
            .as_deref()
            .or_else(|| expected.request.requester_id())
            .ok_or(SadValidationError::AudienceUnknown)?;
        require("aud", audience, sad.audience())?;

        let now = expected.now;
        if now >= sad.expiry().saturating_add(self.clock_skew_seconds) {
            return Err(SadValidationError::Expired {
                expiry: sad.expiry(),
            });
        }
        if sad.issued_at() > now.saturating_add(self.clock_skew_seconds) {
            return Err(SadValidationError::NotYetValid {
                issued_at: sad.issued_at(),
            });
        }

        let request = expected.request;
        let extension = sad.extension();
        require(
            "ver",
            &request.requested_version().to_string(),
            &extension.version.to_string(),
        )?;
        require("reqid", request.sign_request_id(), &extension.request_id)?;
        require(
            "docs",
            &request.document_count().to_string(),
            &extension.number_of_documents.map_or_else(String::new, |docs| docs.to_string()),
        )?;
        if let Some(subject) = expected.subject {
            require("sub", subject, sad.subject())?;
        }
        require_optional("attr", expected.subject_attribute, extension.attribute_name.as_deref())?;
        require_optional("loa", expected.loa, extension.loa.as_deref())?;
        require_optional("irt", expected.in_response_to, extension.in_response_to.as_deref())?;
        Ok(sad)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Requires a claim to equal the expected value.
fn require(claim: &'static str, expected: &str, found: &str) -> Result<(), SadValidationError> {
    if expected == found {
        Ok(())
    } else {
        Err(SadValidationError::Mismatch {
            claim,
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

/// Requires an optional claim to equal the expectation when one is given.
fn require_optional(
    claim: &'static str,
    expected: Option<&str>,
    found: Option<&str>,
) -> Result<(), SadValidationError> {
    match expected {
        Some(expected) => require(claim, expected, found.unwrap_or_default()),
        None => Ok(()),
    }
}
