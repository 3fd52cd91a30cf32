// crates/eid-ext-sap/tests/common/mod.rs
// ============================================================================
// Module: SAP Test Helpers
// Description: Shared keys, configuration, and audit capture for SAP tests.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::Mutex;

use eid_ext_config::EidExtConfig;
use eid_ext_core::SadRequest;
use eid_ext_sap::Ed25519Signer;
use eid_ext_sap::SadAuditEvent;
use eid_ext_sap::SadAuditSink;

/// Fixed issuance time used across suites.
pub const ISSUED_AT: i64 = 1_700_000_000;
/// Identity provider entity identifier.
pub const IDP: &str = "https://idp.example.com/saml";
/// Signing service entity identifier.
pub const SIGN_SERVICE: &str = "https://sign.example.com/service";
/// Deterministic secret key.
pub const SECRET: [u8; 32] = [7u8; 32];

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events.
    pub events: Mutex<Vec<SadAuditEvent>>,
}

impl MemoryAuditSink {
    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<SadAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SadAuditSink for MemoryAuditSink {
    fn record(&self, event: &SadAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Returns a configuration for the test identity provider.
pub fn config() -> EidExtConfig {
    config_with("")
}

/// Returns a configuration with extra TOML appended after `[issuer]`.
pub fn config_with(extra: &str) -> EidExtConfig {
    EidExtConfig::from_toml_str(&format!("[issuer]\nentity_id = \"{IDP}\"\n{extra}"))
        .expect("config")
}

/// Returns the test signer.
pub fn signer() -> Ed25519Signer {
    Ed25519Signer::from_secret_bytes(&SECRET).with_key_id("idp-key-1")
}

/// Returns a SAD request from the signing service.
pub fn request() -> SadRequest {
    SadRequest::builder("f6e7d061a23293b0053dc7b038a04dad", NonZeroU32::new(2).expect("count"))
        .id("_a74a068d0548a919e503e5f9ef901851")
        .requester_id(SIGN_SERVICE)
        .build()
        .expect("request")
}

/// Returns a shared in-memory sink.
pub fn memory_sink() -> Arc<MemoryAuditSink> {
    Arc::new(MemoryAuditSink::default())
}
