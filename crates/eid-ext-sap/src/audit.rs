// crates/eid-ext-sap/src/audit.rs
// ============================================================================
// Module: SAD Audit Logging
// Description: Structured audit events for SAD issuance and validation.
// Purpose: Emit redacted JSON-line audit records without hard dependencies.
// Dependencies: eid-ext-config, eid-ext-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every issuance and validation attempt produces one [`SadAuditEvent`].
//! Tokens are never logged; events carry their SHA-256 digest instead so an
//! operator can correlate a token without being able to replay it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use eid_ext_config::AuditConfig;
use eid_ext_config::AuditSinkKind;
use eid_ext_core::HashDigest;
use eid_ext_core::hashing::DEFAULT_HASH_ALGORITHM;
use eid_ext_core::hashing::hash_bytes;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event name for issuance attempts.
pub const EVENT_SAD_ISSUE: &str = "sad_issue";
/// Event name for validation attempts.
pub const EVENT_SAD_VALIDATE: &str = "sad_validate";

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SadOutcome {
    /// The operation succeeded.
    Success,
    /// The operation was rejected.
    Failure,
}

/// SAD audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SadAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Operation outcome.
    pub outcome: SadOutcome,
    /// SAD token identifier when known.
    pub jti: Option<String>,
    /// Sign request identifier from the SAD request.
    pub sign_request_id: Option<String>,
    /// Token issuer when known.
    pub issuer: Option<String>,
    /// Token audience when known.
    pub audience: Option<String>,
    /// Level of assurance stamped into the token.
    pub loa: Option<String>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Digest of the compact token.
    pub token_hash: Option<HashDigest>,
}

impl SadAuditEvent {
    /// Creates an event with the current timestamp and no details.
    #[must_use]
    pub fn new(event: &'static str, outcome: SadOutcome) -> Self {
        Self {
            event,
            timestamp_ms: now_millis(),
            outcome,
            jti: None,
            sign_request_id: None,
            issuer: None,
            audience: None,
            loa: None,
            error_kind: None,
            token_hash: None,
        }
    }

    /// Records the digest of `token`.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.token_hash = Some(token_hash(token));
        self
    }
}

/// Returns the digest used to identify a token in audit records.
#[must_use]
pub fn token_hash(token: &str) -> HashDigest {
    hash_bytes(DEFAULT_HASH_ALGORITHM, token.as_bytes())
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for SAD events.
pub trait SadAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &SadAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct SadStderrAuditSink;

impl SadAuditSink for SadStderrAuditSink {
    fn record(&self, event: &SadAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct SadFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl SadFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl SadAuditSink for SadFileAuditSink {
    fn record(&self, event: &SadAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct SadNoopAuditSink;

impl SadAuditSink for SadNoopAuditSink {
    fn record(&self, _event: &SadAuditEvent) {}
}

/// Builds the sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the file sink cannot open its log file.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn SadAuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Arc::new(SadStderrAuditSink)),
        (AuditSinkKind::Disabled, _) => Ok(Arc::new(SadNoopAuditSink)),
        (AuditSinkKind::File, Some(path)) => {
            Ok(Arc::new(SadFileAuditSink::new(Path::new(path.trim()))?))
        }
        (AuditSinkKind::File, None) => {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "file audit sink requires a path"))
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current time in milliseconds since the Unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}
