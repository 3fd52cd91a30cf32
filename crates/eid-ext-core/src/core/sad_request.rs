// crates/eid-ext-core/src/core/sad_request.rs
// ============================================================================
// Module: SAD Request
// Description: Signature Activation Protocol request model and element codec.
// Purpose: Carry the signing service's request for Signature Activation Data.
// Dependencies: thiserror, crate::core::{element, version}
// ============================================================================

//! ## Overview
//! A signing service places a `SADRequest` in the extensions of its
//! authentication request. It names the sign request the SAD will activate,
//! the number of documents to be signed, the SAP version wanted, and an
//! ordered bag of name/value parameters.
//!
//! Decoding is tolerant: unknown child elements are skipped and only local
//! names are compared, so any namespace binding is accepted. Identifier text
//! is taken verbatim so an encoded request decodes back unchanged; only
//! `DocCount` and `RequestedVersion` are trimmed before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::num::NonZeroU32;

use thiserror::Error;

use crate::core::constants::SAP_NAMESPACE;
use crate::core::constants::SAP_PREFIX;
use crate::core::element::Element;
use crate::core::element::QualifiedName;
use crate::core::version::VersionError;
use crate::core::version::VersionTag;

// ============================================================================
// SECTION: Element Names
// ============================================================================

/// Root element local name.
pub const SAD_REQUEST_ELEMENT: &str = "SADRequest";
/// Requester identifier child.
const REQUESTER_ID: &str = "RequesterID";
/// Sign request identifier child.
const SIGN_REQUEST_ID: &str = "SignRequestID";
/// Document count child.
const DOC_COUNT: &str = "DocCount";
/// Requested version child.
const REQUESTED_VERSION: &str = "RequestedVersion";
/// Parameter container child.
const REQUEST_PARAMS: &str = "RequestParams";
/// Single parameter element.
const PARAMETER: &str = "Parameter";
/// Parameter name attribute.
const PARAMETER_NAME: &str = "Name";
/// Request identifier attribute.
const ID_ATTRIBUTE: &str = "ID";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Name/value parameter attached to a SAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl RequestParameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Signature Activation Protocol request.
///
/// # Invariants
/// - `sign_request_id` is not blank and `document_count` is positive.
/// - `requester_id`, when present, is not blank.
/// - `parameters` keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SadRequest {
    /// Message identifier (`ID` attribute).
    id: Option<String>,
    /// Entity identifier of the requesting signing service.
    requester_id: Option<String>,
    /// Identifier of the sign request the SAD activates.
    sign_request_id: String,
    /// Number of documents in the sign request.
    document_count: NonZeroU32,
    /// Requested SAP version.
    requested_version: VersionTag,
    /// Ordered request parameters.
    parameters: Vec<RequestParameter>,
}

impl SadRequest {
    /// Creates a request with the mandatory fields and version 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`SadRequestError::BlankValue`] when `sign_request_id` is blank.
    pub fn new(
        sign_request_id: impl Into<String>,
        document_count: NonZeroU32,
    ) -> Result<Self, SadRequestError> {
        Self::builder(sign_request_id, document_count).build()
    }

    /// Starts a fluent builder with the mandatory fields.
    #[must_use]
    pub fn builder(
        sign_request_id: impl Into<String>,
        document_count: NonZeroU32,
    ) -> SadRequestBuilder {
        SadRequestBuilder {
            request: Self {
                id: None,
                requester_id: None,
                sign_request_id: sign_request_id.into(),
                document_count,
                requested_version: VersionTag::V1_0,
                parameters: Vec::new(),
            },
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the requester entity identifier.
    #[must_use]
    pub fn requester_id(&self) -> Option<&str> {
        self.requester_id.as_deref()
    }

    /// Returns the sign request identifier.
    #[must_use]
    pub fn sign_request_id(&self) -> &str {
        &self.sign_request_id
    }

    /// Returns the number of documents to be signed.
    #[must_use]
    pub const fn document_count(&self) -> NonZeroU32 {
        self.document_count
    }

    /// Returns the requested SAP version.
    #[must_use]
    pub const fn requested_version(&self) -> VersionTag {
        self.requested_version
    }

    /// Returns the parameters in insertion order.
    #[must_use]
    pub fn parameters(&self) -> &[RequestParameter] {
        &self.parameters
    }

    /// Returns the value of the first parameter named `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.iter().find(|param| param.name == name).map(|param| param.value.as_str())
    }

    /// Encodes the request in the SAP namespace.
    #[must_use]
    pub fn encode(&self) -> Element {
        self.encode_in(SAP_NAMESPACE, SAP_PREFIX)
    }

    /// Encodes the request under the given namespace and prefix.
    #[must_use]
    pub fn encode_in(&self, namespace: &str, prefix: &str) -> Element {
        let root = QualifiedName::namespaced(namespace, prefix, SAD_REQUEST_ELEMENT);
        let mut element = Element::new(root.clone());
        if let Some(id) = &self.id {
            element.set_attribute(ID_ATTRIBUTE, id.as_str());
        }
        if let Some(requester_id) = &self.requester_id {
            element.children.push(Element::new(root.sibling(REQUESTER_ID)).with_text(requester_id));
        }
        element
            .children
            .push(Element::new(root.sibling(SIGN_REQUEST_ID)).with_text(&self.sign_request_id));
        element
            .children
            .push(Element::new(root.sibling(DOC_COUNT)).with_text(self.document_count.to_string()));
        element.children.push(
            Element::new(root.sibling(REQUESTED_VERSION))
                .with_text(self.requested_version.to_string()),
        );
        if !self.parameters.is_empty() {
            let mut params = Element::new(root.sibling(REQUEST_PARAMS));
            for parameter in &self.parameters {
                params.children.push(
                    Element::new(root.sibling(PARAMETER))
                        .with_attribute(PARAMETER_NAME, parameter.name.as_str())
                        .with_text(&parameter.value),
                );
            }
            element.children.push(params);
        }
        element
    }

    /// Decodes a request element.
    ///
    /// # Errors
    ///
    /// Returns [`SadRequestError`] when the element is not a `SADRequest`, a
    /// mandatory child is missing, or a value is malformed.
    pub fn decode(element: &Element) -> Result<Self, SadRequestError> {
        if element.local_name() != SAD_REQUEST_ELEMENT {
            return Err(SadRequestError::UnexpectedElement(element.local_name().to_string()));
        }
        let sign_request_id = element
            .child_text(SIGN_REQUEST_ID)
            .filter(|text| !is_blank(text))
            .ok_or(SadRequestError::MissingElement(SIGN_REQUEST_ID))?;
        let doc_count = required_text(element, DOC_COUNT)?;
        let document_count = doc_count
            .parse::<NonZeroU32>()
            .map_err(|_| SadRequestError::InvalidDocumentCount(doc_count.to_string()))?;
        let requested_version = match optional_text(element, REQUESTED_VERSION) {
            Some(text) => VersionTag::parse(text)?,
            None => VersionTag::V1_0,
        };
        let mut parameters = Vec::new();
        if let Some(params) = element.child(REQUEST_PARAMS) {
            for parameter in params.children_named(PARAMETER) {
                let name = parameter
                    .attribute(PARAMETER_NAME)
                    .ok_or(SadRequestError::MissingParameterName)?;
                parameters.push(RequestParameter::new(name, parameter.text().unwrap_or_default()));
            }
        }
        Ok(Self {
            id: element.attribute(ID_ATTRIBUTE).map(str::to_string),
            requester_id: element
                .child_text(REQUESTER_ID)
                .filter(|text| !is_blank(text))
                .map(str::to_string),
            sign_request_id: sign_request_id.to_string(),
            document_count,
            requested_version,
            parameters,
        })
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Fluent builder for [`SadRequest`].
#[derive(Debug, Clone)]
pub struct SadRequestBuilder {
    /// Request under construction.
    request: SadRequest,
}

impl SadRequestBuilder {
    /// Sets the message identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.request.id = Some(id.into());
        self
    }

    /// Sets the requester entity identifier.
    #[must_use]
    pub fn requester_id(mut self, requester_id: impl Into<String>) -> Self {
        self.request.requester_id = Some(requester_id.into());
        self
    }

    /// Sets the requested SAP version.
    #[must_use]
    pub const fn requested_version(mut self, version: VersionTag) -> Self {
        self.request.requested_version = version;
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.parameters.push(RequestParameter::new(name, value));
        self
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns [`SadRequestError::BlankValue`] when the sign request id or a
    /// set requester id is blank.
    pub fn build(self) -> Result<SadRequest, SadRequestError> {
        if is_blank(&self.request.sign_request_id) {
            return Err(SadRequestError::BlankValue(SIGN_REQUEST_ID));
        }
        if self.request.requester_id.as_deref().is_some_and(is_blank) {
            return Err(SadRequestError::BlankValue(REQUESTER_ID));
        }
        Ok(self.request)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when decoding a malformed SAD request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SadRequestError {
    /// The root element is not a `SADRequest`.
    #[error("unexpected element: {0}")]
    UnexpectedElement(String),
    /// A mandatory child element is absent or empty.
    #[error("missing mandatory element: {0}")]
    MissingElement(&'static str),
    /// `DocCount` is not a positive integer.
    #[error("invalid document count: {0}")]
    InvalidDocumentCount(String),
    /// `RequestedVersion` is not a valid version string.
    #[error("invalid requested version: {0}")]
    InvalidVersion(#[from] VersionError),
    /// A `Parameter` element has no `Name` attribute.
    #[error("request parameter without name")]
    MissingParameterName,
    /// An identifier passed to the builder is empty or whitespace.
    #[error("{0} must not be blank")]
    BlankValue(&'static str),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the trimmed, non-empty text of an optional child.
fn optional_text<'a>(element: &'a Element, local: &str) -> Option<&'a str> {
    element.child_text(local).map(str::trim).filter(|text| !text.is_empty())
}

/// Returns true for empty or whitespace-only text.
fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Returns the trimmed, non-empty text of a mandatory child.
fn required_text<'a>(element: &'a Element, local: &'static str) -> Result<&'a str, SadRequestError> {
    optional_text(element, local).ok_or(SadRequestError::MissingElement(local))
}
