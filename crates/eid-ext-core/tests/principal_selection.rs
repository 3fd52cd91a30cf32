// crates/eid-ext-core/tests/principal_selection.rs
// ============================================================================
// Module: Principal Selection Tests
// Description: Tests for principal selection builders and codec.
// ============================================================================
//! ## Overview
//! Verifies builder snapshot semantics and that the codec keeps absent and
//! empty values apart.

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

use eid_ext_core::Element;
use eid_ext_core::MatchValue;
use eid_ext_core::PrincipalSelection;
use eid_ext_core::PrincipalSelectionBuilder;
use eid_ext_core::PrincipalSelectionError;
use eid_ext_core::QualifiedName;
use eid_ext_core::RequestedPrincipalSelection;
use eid_ext_core::RequestedPrincipalSelectionBuilder;
use eid_ext_core::constants::ATTRIBUTE_PERSONAL_IDENTITY_NUMBER;
use eid_ext_core::constants::ATTRIBUTE_PRID;
use eid_ext_core::constants::NAME_FORMAT_URI;
use eid_ext_core::constants::PRINCIPAL_SELECTION_NAMESPACE;

fn declarative() -> PrincipalSelection {
    let mut builder = PrincipalSelection::builder();
    builder
        .add_match_value(ATTRIBUTE_PERSONAL_IDENTITY_NUMBER, Some(NAME_FORMAT_URI), "196302052383")
        .add_match_value(ATTRIBUTE_PRID, None, "NO:05068907693");
    builder.build().expect("build")
}

#[test]
fn declarative_selection_round_trips() {
    let selection = declarative();
    let element = selection.encode();
    assert_eq!(element.local_name(), "PrincipalSelection");
    assert_eq!(element.children.len(), 2);
    let decoded = PrincipalSelection::decode(&element).expect("decode");
    assert_eq!(decoded, selection);

    let first = &decoded.match_values()[0];
    assert_eq!(first.name(), ATTRIBUTE_PERSONAL_IDENTITY_NUMBER);
    assert_eq!(first.name_format(), Some(NAME_FORMAT_URI));
    assert_eq!(first.value(), Some("196302052383"));

    let second = &decoded.match_values()[1];
    assert_eq!(second.name_format(), None);
    assert_eq!(second.effective_name_format(), NAME_FORMAT_URI);
    assert_eq!(second.value(), Some("NO:05068907693"));
}

#[test]
fn requested_selection_keeps_value_absent() {
    let mut builder = RequestedPrincipalSelection::builder();
    builder
        .add_match_value(ATTRIBUTE_PERSONAL_IDENTITY_NUMBER, None, None)
        .add_match_value(ATTRIBUTE_PRID, Some(NAME_FORMAT_URI), None);
    let requested = builder.build().expect("build");
    let element = requested.encode();
    assert!(element.children.iter().all(|child| child.text.is_none()));

    let decoded = RequestedPrincipalSelection::decode(&element).expect("decode");
    assert_eq!(decoded, requested);
    assert_eq!(decoded.match_values()[0].value(), None);
    assert_eq!(decoded.match_values()[0].name_format(), None);
    assert_eq!(decoded.find(ATTRIBUTE_PRID).and_then(MatchValue::name_format), Some(NAME_FORMAT_URI));
}

#[test]
fn empty_value_is_distinct_from_absent_value() {
    let mut builder = RequestedPrincipalSelectionBuilder::default();
    builder.add_match_value("urn:a", None, Some("")).add_match_value("urn:b", None, None);
    let requested = builder.build().unwrap();
    let decoded = RequestedPrincipalSelection::decode(&requested.encode()).unwrap();
    assert_eq!(decoded.match_values()[0].value(), Some(""));
    assert_eq!(decoded.match_values()[1].value(), None);
}

#[test]
fn build_snapshots_are_isolated_from_later_additions() {
    let template = declarative();
    let mut builder = PrincipalSelectionBuilder::from_template(&template);
    let first = builder.build().unwrap();
    builder.add_match_value("urn:extra", None, "x");
    let second = builder.build().unwrap();

    assert_eq!(first, template);
    assert_eq!(first.match_values().len(), 2);
    assert_eq!(second.match_values().len(), 3);
    assert_eq!(template.match_values().len(), 2);
}

#[test]
fn builders_sharing_a_template_do_not_alias() {
    let template = declarative();
    let mut left = PrincipalSelectionBuilder::from_template(&template);
    let mut right = PrincipalSelectionBuilder::from_template(&template);
    let built_left = left.build().unwrap();
    right.add_match_value("urn:right", None, "r");
    left.add_match_value("urn:left", None, "l");
    assert_eq!(built_left.match_values().len(), 2);
    assert!(right.build().unwrap().find("urn:left").is_none());
    assert!(left.build().unwrap().find("urn:right").is_none());
}

#[test]
fn declarative_builder_requires_values() {
    let mut builder = PrincipalSelection::builder();
    builder.push(MatchValue::new("urn:no-value"));
    let err = builder.build().unwrap_err();
    assert_eq!(err, PrincipalSelectionError::MissingValue("urn:no-value".to_string()));
}

#[test]
fn builders_reject_blank_names() {
    let mut builder = RequestedPrincipalSelection::builder();
    builder.push(MatchValue::new("  "));
    assert_eq!(builder.build().unwrap_err(), PrincipalSelectionError::MissingName);
}

#[test]
fn declarative_decode_rejects_missing_value() {
    let ns = |local: &str| QualifiedName::namespaced(PRINCIPAL_SELECTION_NAMESPACE, "psc", local);
    let element = Element::new(ns("PrincipalSelection"))
        .with_child(Element::new(ns("MatchValue")).with_attribute("Name", "urn:a"));
    let err = PrincipalSelection::decode(&element).unwrap_err();
    assert_eq!(err, PrincipalSelectionError::MissingValue("urn:a".to_string()));
}

#[test]
fn declarative_selection_rejects_blank_values() {
    for blank in ["", "  "] {
        let mut builder = PrincipalSelection::builder();
        builder.add_match_value("urn:blank", None, blank);
        let err = builder.build().unwrap_err();
        assert_eq!(err, PrincipalSelectionError::MissingValue("urn:blank".to_string()));
    }

    let ns = |local: &str| QualifiedName::namespaced(PRINCIPAL_SELECTION_NAMESPACE, "psc", local);
    let element = Element::new(ns("PrincipalSelection"))
        .with_child(Element::new(ns("MatchValue")).with_attribute("Name", "urn:a").with_text(""));
    let err = PrincipalSelection::decode(&element).unwrap_err();
    assert_eq!(err, PrincipalSelectionError::MissingValue("urn:a".to_string()));
}

#[test]
fn decode_rejects_nameless_entry_and_wrong_root() {
    let ns = |local: &str| QualifiedName::namespaced(PRINCIPAL_SELECTION_NAMESPACE, "psc", local);
    let nameless = Element::new(ns("RequestedPrincipalSelection"))
        .with_child(Element::new(ns("MatchValue")));
    assert_eq!(
        RequestedPrincipalSelection::decode(&nameless).unwrap_err(),
        PrincipalSelectionError::MissingName
    );
    let wrong = Element::new(ns("PrincipalSelection"));
    assert!(matches!(
        RequestedPrincipalSelection::decode(&wrong),
        Err(PrincipalSelectionError::UnexpectedElement { .. })
    ));
}

#[test]
fn decode_accepts_foreign_namespace() {
    let selection = declarative();
    let foreign = selection.encode_in("urn:example:psc", "p");
    assert_eq!(PrincipalSelection::decode(&foreign).unwrap(), selection);
}
