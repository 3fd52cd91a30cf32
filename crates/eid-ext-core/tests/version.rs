// crates/eid-ext-core/tests/version.rs
// ============================================================================
// Module: Version Tag Tests
// Description: Tests for version parsing, formatting, and equality.
// ============================================================================
//! ## Overview
//! Verifies that version tags keep their canonical `major.minor` form and
//! compare by value.

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

use eid_ext_core::VersionError;
use eid_ext_core::VersionTag;
use proptest::prelude::*;

#[test]
fn version_one_zero_matches_constant() {
    let parsed = VersionTag::parse("1.0").expect("parse");
    assert_eq!(parsed, VersionTag::V1_0);
    assert_eq!(VersionTag::of(1, 0), VersionTag::V1_0);
    assert_eq!(VersionTag::default(), VersionTag::V1_0);
    assert_eq!(VersionTag::V1_0.to_string(), "1.0");
}

#[test]
fn independently_built_versions_are_equal() {
    let a = VersionTag::of(2, 3);
    let b = VersionTag::parse("2.3").expect("parse");
    assert_eq!(a, b);
    assert_eq!(a.major(), 2);
    assert_eq!(a.minor(), 3);
    assert_ne!(a, VersionTag::of(3, 2));
}

#[test]
fn malformed_versions_are_rejected() {
    for text in ["", "1", "1.", ".0", "1.0.0", "a.b", "1.x", "-1.0", "+1.0", " 1.0", "1 .0"] {
        let err = VersionTag::parse(text).unwrap_err();
        assert_eq!(err, VersionError::Malformed(text.to_string()), "input {text:?}");
    }
}

#[test]
fn version_serializes_as_string() {
    let json = serde_json::to_string(&VersionTag::of(1, 2)).expect("serialize");
    assert_eq!(json, "\"1.2\"");
    let decoded: VersionTag = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, VersionTag::of(1, 2));
    assert!(serde_json::from_str::<VersionTag>("\"one\"").is_err());
}

#[test]
fn version_from_str_delegates_to_parse() {
    let parsed: VersionTag = "4.7".parse().expect("from_str");
    assert_eq!(parsed, VersionTag::of(4, 7));
}

proptest! {
    #[test]
    fn version_text_round_trips(major in 0u32..10_000, minor in 0u32..10_000) {
        let version = VersionTag::of(major, minor);
        let text = version.to_string();
        prop_assert_eq!(text.clone(), format!("{major}.{minor}"));
        prop_assert_eq!(VersionTag::parse(&text).unwrap(), version);
    }
}
