// crates/eid-ext-sap/src/issuer.rs
// ============================================================================
// Module: SAD Issuer
// Description: Identity provider side of the Signature Activation Protocol.
// Purpose: Answer SAD requests with signed, audited SAD tokens.
// Dependencies: eid-ext-config, eid-ext-core, eid-ext-xml, rand
// ============================================================================

//! ## Overview
//! The issuer binds an authenticated user to a signing request. The SAD
//! version is the one the request asks for and must be in the configured
//! supported set. When a sign message was displayed to the user, the stamped
//! LoA is the signature-message variant of the achieved LoA. The audience is
//! the requester of the SAD request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use eid_ext_config::EidExtConfig;
use eid_ext_config::IssuerConfig;
use eid_ext_core::Sad;
use eid_ext_core::SadError;
use eid_ext_core::SadExtension;
use eid_ext_core::SadParams;
use eid_ext_core::SadRequest;
use eid_ext_core::SadSigner;
use eid_ext_core::VersionTag;
use eid_ext_core::hashing::hex_encode;
use eid_ext_core::loa;
use eid_ext_xml::XmlError;
use eid_ext_xml::XmlLimits;
use eid_ext_xml::sad_request_from_xml;
use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::audit::EVENT_SAD_ISSUE;
use crate::audit::SadAuditEvent;
use crate::audit::SadAuditSink;
use crate::audit::SadOutcome;
use crate::jws::JwsError;
use crate::jws::JwsHeader;
use crate::jws::encode_jws;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Number of random bytes in a token identifier.
const JTI_BYTES: usize = 8;

/// Authentication facts the issuer binds into a SAD.
#[derive(Debug, Clone, Copy)]
pub struct SadIssueInput<'a> {
    /// SAD request received with the authentication request.
    pub request: &'a SadRequest,
    /// Name of the attribute identifying the user.
    pub subject_attribute: &'a str,
    /// Value of that attribute for the authenticated user.
    pub subject: &'a str,
    /// LoA URI achieved by the authentication.
    pub loa: &'a str,
    /// Whether a sign message was displayed to the user.
    pub sign_message_displayed: bool,
    /// Identifier of the authentication request being answered.
    pub authn_request_id: Option<&'a str>,
    /// Issuance time in seconds since the epoch.
    pub issued_at: i64,
}

/// A signed SAD and its claim set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSad {
    /// Claim set that was signed.
    pub sad: Sad,
    /// Compact signed token.
    pub token: String,
}

/// Errors raised while issuing a SAD.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    /// The SAD request names no requester to use as audience.
    #[error("sad request has no requester id")]
    MissingRequester,
    /// The subject attribute or value is blank.
    #[error("subject attribute and value must be non-empty")]
    MissingSubject,
    /// The requested version is not supported.
    #[error("unsupported sad version: {0}")]
    UnsupportedVersion(VersionTag),
    /// The achieved LoA is not a known assurance level.
    #[error("unknown level of assurance: {0}")]
    UnknownLoa(String),
    /// The achieved LoA has no signature-message variant.
    #[error("level of assurance has no sign message variant: {0}")]
    NoSignatureVariant(String),
    /// The SAD request XML could not be decoded.
    #[error(transparent)]
    Request(#[from] XmlError),
    /// The claim set is invalid.
    #[error(transparent)]
    Sad(#[from] SadError),
    /// Signing the token failed.
    #[error(transparent)]
    Jws(#[from] JwsError),
}

impl IssueError {
    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingRequester => "missing_requester",
            Self::MissingSubject => "missing_subject",
            Self::UnsupportedVersion(_) => "unsupported_version",
            Self::UnknownLoa(_) => "unknown_loa",
            Self::NoSignatureVariant(_) => "no_signature_variant",
            Self::Request(_) => "invalid_request",
            Self::Sad(_) => "invalid_claims",
            Self::Jws(_) => "signing_failed",
        }
    }
}

// ============================================================================
// SECTION: Issuer
// ============================================================================

/// Issues signed SAD tokens.
pub struct SadIssuer {
    /// Entity id, token lifetime, and supported versions.
    issuer: IssuerConfig,
    /// XML input limits for SAD requests.
    xml_limits: XmlLimits,
    /// Token signer.
    signer: Arc<dyn SadSigner>,
    /// Audit sink.
    audit: Arc<dyn SadAuditSink>,
}

impl SadIssuer {
    /// Creates an issuer from validated configuration.
    #[must_use]
    pub fn new(
        config: &EidExtConfig,
        signer: Arc<dyn SadSigner>,
        audit: Arc<dyn SadAuditSink>,
    ) -> Self {
        Self {
            issuer: config.issuer.clone(),
            xml_limits: XmlLimits {
                max_bytes: config.limits.max_xml_bytes,
                max_depth: config.limits.max_xml_depth,
            },
            signer,
            audit,
        }
    }

    /// Decodes a `SADRequest` XML document under the configured limits.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::Request`] when the document is invalid.
    pub fn decode_request(&self, xml: &str) -> Result<SadRequest, IssueError> {
        Ok(sad_request_from_xml(xml, self.xml_limits)?)
    }

    /// Issues a signed SAD for an authenticated user and records the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError`] when the request cannot be answered.
    pub fn issue(&self, input: &SadIssueInput<'_>) -> Result<IssuedSad, IssueError> {
        let result = self.build(input);
        let outcome = if result.is_ok() { SadOutcome::Success } else { SadOutcome::Failure };
        let mut event = SadAuditEvent::new(EVENT_SAD_ISSUE, outcome);
        event.sign_request_id = Some(input.request.sign_request_id().to_string());
        event.issuer = Some(self.issuer.entity_id.clone());
        event.audience = input.request.requester_id().map(str::to_string);
        match &result {
            Ok(issued) => {
                event = event.with_token(&issued.token);
                event.jti = Some(issued.sad.jwt_id().to_string());
                event.loa = issued.sad.extension().loa.clone();
            }
            Err(err) => event.error_kind = Some(err.kind()),
        }
        self.audit.record(&event);
        result
    }

    /// Builds and signs the SAD without auditing.
    fn build(&self, input: &SadIssueInput<'_>) -> Result<IssuedSad, IssueError> {
        let request = input.request;
        let audience = request.requester_id().ok_or(IssueError::MissingRequester)?;
        if input.subject.trim().is_empty() || input.subject_attribute.trim().is_empty() {
            return Err(IssueError::MissingSubject);
        }
        let version = request.requested_version();
        if !self.issuer.supports(version) {
            return Err(IssueError::UnsupportedVersion(version));
        }
        let loa = stamped_loa(input.loa, input.sign_message_displayed)?;

        let mut extension = SadExtension::new(version, request.sign_request_id());
        extension.in_response_to = input.authn_request_id.map(str::to_string);
        extension.attribute_name = Some(input.subject_attribute.to_string());
        extension.loa = Some(loa.to_string());
        extension.number_of_documents = Some(request.document_count().get());

        let sad = Sad::issue(SadParams {
            subject: input.subject.to_string(),
            audience: audience.to_string(),
            issuer: self.issuer.entity_id.clone(),
            issued_at: input.issued_at,
            ttl_seconds: self.issuer.ttl_seconds,
            jwt_id: generate_jti(),
            extension,
        })?;
        let payload = sad.to_compact_form()?;
        let header = JwsHeader::for_signer(self.signer.as_ref());
        let token = encode_jws(&header, payload.as_bytes(), self.signer.as_ref())?;
        Ok(IssuedSad {
            sad,
            token,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the LoA URI to stamp into the SAD.
fn stamped_loa(achieved: &str, sign_message_displayed: bool) -> Result<&'static str, IssueError> {
    let level = loa::lookup(achieved).ok_or_else(|| IssueError::UnknownLoa(achieved.to_string()))?;
    if sign_message_displayed {
        loa::to_signature_variant(level.uri)
            .ok_or_else(|| IssueError::NoSignatureVariant(achieved.to_string()))
    } else {
        Ok(level.uri)
    }
}

/// Generates a random hex token identifier.
fn generate_jti() -> String {
    let mut bytes = [0u8; JTI_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex_encode(&bytes)
}
