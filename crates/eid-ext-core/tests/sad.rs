// crates/eid-ext-core/tests/sad.rs
// ============================================================================
// Module: Signature Activation Data Tests
// Description: Tests for SAD construction and compact form.
// ============================================================================
//! ## Overview
//! Verifies SAD time-range invariants, canonical serialization, decoding of
//! mandatory claims, and request cross-checks.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::num::NonZeroU32;

use eid_ext_core::Sad;
use eid_ext_core::SadError;
use eid_ext_core::SadExtension;
use eid_ext_core::SadParams;
use eid_ext_core::SadRequest;
use eid_ext_core::VersionTag;
use eid_ext_core::constants::ATTRIBUTE_PERSONAL_IDENTITY_NUMBER;
use eid_ext_core::loa;
use serde_json::Value;
use serde_json::json;

/// 2018-01-17T14:22:37Z.
const ISSUED_AT: i64 = 1_516_198_957;

fn sample_extension() -> SadExtension {
    SadExtension {
        version: VersionTag::V1_0,
        in_response_to: Some("_a74a068d0548a919e503e5f9ef901851".to_string()),
        attribute_name: Some(ATTRIBUTE_PERSONAL_IDENTITY_NUMBER.to_string()),
        loa: Some(loa::LOA3.to_string()),
        request_id: "f6e7d061a23293b0053dc7b038a04dad".to_string(),
        number_of_documents: Some(1),
    }
}

fn sample_sad() -> Sad {
    Sad::issue(SadParams {
        subject: "196302052383".to_string(),
        audience: "http://www.example.com/sigservice".to_string(),
        issuer: "https://idp.svelegtest.se/idp".to_string(),
        issued_at: ISSUED_AT,
        ttl_seconds: 300,
        jwt_id: "d4073fc74b1b9199".to_string(),
        extension: sample_extension(),
    })
    .expect("issue")
}

#[test]
fn sad_round_trips_through_compact_form() {
    let sad = sample_sad();
    assert_eq!(sad.expiry(), ISSUED_AT + 300);
    let compact = sad.to_compact_form().expect("compact");
    let decoded = Sad::from_compact_form(&compact).expect("decode");
    assert_eq!(decoded, sad);
    assert_eq!(decoded.extension(), sad.extension());
}

#[test]
fn compact_form_uses_sap_claim_names_in_sorted_order() {
    let compact = sample_sad().to_compact_form().expect("compact");
    assert!(compact.starts_with("{\"aud\":"), "{compact}");
    let value: Value = serde_json::from_str(&compact).expect("json");
    assert_eq!(value["sub"], json!("196302052383"));
    assert_eq!(value["iat"], json!(ISSUED_AT));
    assert_eq!(value["exp"], json!(ISSUED_AT + 300));
    assert_eq!(value["jti"], json!("d4073fc74b1b9199"));
    let ext = &value["seElnSadext"];
    assert_eq!(ext["ver"], json!("1.0"));
    assert_eq!(ext["irt"], json!("_a74a068d0548a919e503e5f9ef901851"));
    assert_eq!(ext["attr"], json!(ATTRIBUTE_PERSONAL_IDENTITY_NUMBER));
    assert_eq!(ext["loa"], json!(loa::LOA3));
    assert_eq!(ext["reqid"], json!("f6e7d061a23293b0053dc7b038a04dad"));
    assert_eq!(ext["docs"], json!(1));
}

#[test]
fn compact_form_is_stable_across_calls() {
    let sad = sample_sad();
    assert_eq!(sad.to_compact_form().unwrap(), sad.clone().to_compact_form().unwrap());
}

#[test]
fn optional_extension_claims_are_omitted_and_recovered_as_absent() {
    let sad = Sad::new(
        "subject",
        "aud",
        "iss",
        10,
        20,
        "jti",
        SadExtension::new(VersionTag::V1_0, "req"),
    )
    .expect("sad");
    let compact = sad.to_compact_form().unwrap();
    assert!(!compact.contains("\"irt\""));
    assert!(!compact.contains("\"docs\""));
    let decoded = Sad::from_compact_form(&compact).unwrap();
    assert_eq!(decoded.extension().loa, None);
    assert_eq!(decoded, sad);
}

#[test]
fn expiry_must_follow_issuance() {
    let err = Sad::new("s", "a", "i", 100, 100, "j", sample_extension()).unwrap_err();
    assert!(matches!(err, SadError::InvalidTimeRange(_)));
    let err = Sad::new("s", "a", "i", 100, 50, "j", sample_extension()).unwrap_err();
    assert!(matches!(err, SadError::InvalidTimeRange(_)));
}

#[test]
fn zero_or_overflowing_ttl_is_rejected() {
    let mut params = SadParams {
        subject: "s".to_string(),
        audience: "a".to_string(),
        issuer: "i".to_string(),
        issued_at: ISSUED_AT,
        ttl_seconds: 0,
        jwt_id: "j".to_string(),
        extension: sample_extension(),
    };
    assert!(matches!(Sad::issue(params.clone()), Err(SadError::InvalidTimeRange(_))));
    params.ttl_seconds = u64::MAX;
    assert!(matches!(Sad::issue(params), Err(SadError::InvalidTimeRange(_))));
}

#[test]
fn missing_mandatory_claims_are_malformed() {
    let full: Value = serde_json::from_str(&sample_sad().to_compact_form().unwrap()).unwrap();
    for claim in ["sub", "aud", "iss", "iat", "exp", "jti", "seElnSadext"] {
        let mut value = full.clone();
        value.as_object_mut().unwrap().remove(claim);
        let err = Sad::from_compact_form(&value.to_string()).unwrap_err();
        assert!(matches!(err, SadError::MalformedToken(_)), "claim {claim}");
    }
    for claim in ["ver", "reqid"] {
        let mut value = full.clone();
        value["seElnSadext"].as_object_mut().unwrap().remove(claim);
        let err = Sad::from_compact_form(&value.to_string()).unwrap_err();
        assert!(matches!(err, SadError::MalformedToken(_)), "extension claim {claim}");
    }
}

#[test]
fn invalid_syntax_is_malformed() {
    for text in ["", "{", "[]", "null", "{\"sub\":1}"] {
        let err = Sad::from_compact_form(text).unwrap_err();
        assert!(matches!(err, SadError::MalformedToken(_)), "input {text:?}");
    }
}

#[test]
fn decoded_time_range_is_enforced() {
    let mut value: Value = serde_json::from_str(&sample_sad().to_compact_form().unwrap()).unwrap();
    value["exp"] = json!(ISSUED_AT - 1);
    let err = Sad::from_compact_form(&value.to_string()).unwrap_err();
    assert!(matches!(err, SadError::InvalidTimeRange(_)));
}

#[test]
fn unknown_claims_are_ignored() {
    let mut value: Value = serde_json::from_str(&sample_sad().to_compact_form().unwrap()).unwrap();
    value["nbf"] = json!(ISSUED_AT);
    let decoded = Sad::from_compact_form(&value.to_string()).unwrap();
    assert_eq!(decoded, sample_sad());
}

#[test]
fn expiry_converts_to_timestamp() {
    let sad = sample_sad();
    let issued = sad.issued_at_as_timestamp().unwrap();
    assert_eq!(issued.year(), 2018);
    assert_eq!(u8::from(issued.month()), 1);
    assert_eq!(issued.day(), 17);
    assert_eq!((issued.hour(), issued.minute(), issued.second()), (14, 22, 37));
    let expiry = sad.expiry_as_timestamp().unwrap();
    assert_eq!(expiry.unix_timestamp() - issued.unix_timestamp(), 300);
}

#[test]
fn out_of_range_expiry_is_reported() {
    let sad = Sad::new("s", "a", "i", 0, i64::MAX, "j", sample_extension()).unwrap();
    assert_eq!(sad.expiry_as_timestamp().unwrap_err(), SadError::TimestampOutOfRange(i64::MAX));
}

#[test]
fn sad_answers_matching_request_only() {
    let request =
        SadRequest::new("f6e7d061a23293b0053dc7b038a04dad", NonZeroU32::new(1).unwrap()).unwrap();
    assert!(sample_sad().answers(&request));
    let other = SadRequest::new("other", NonZeroU32::new(1).unwrap()).unwrap();
    assert!(!sample_sad().answers(&other));
    let more_docs =
        SadRequest::new("f6e7d061a23293b0053dc7b038a04dad", NonZeroU32::new(2).unwrap()).unwrap();
    assert!(!sample_sad().answers(&more_docs));
}
