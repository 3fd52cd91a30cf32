// crates/eid-ext-config/tests/config_load.rs
// ============================================================================
// Module: Config Loading Tests
// Description: File loading limits for eid-ext.toml.
// Purpose: Ensure oversized, non-utf8, and missing files fail closed.
// ============================================================================
//! ## Overview
//! Writes configuration files into temporary directories and loads them.
//! Path resolution is exercised with the environment value passed in, so
//! tests never mutate the process environment.

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

use std::fs;
use std::path::PathBuf;

use eid_ext_config::AuditSinkKind;
use eid_ext_config::ConfigError;
use eid_ext_config::DEFAULT_CONFIG_NAME;
use eid_ext_config::EidExtConfig;
use eid_ext_config::resolve_config_path;

#[test]
fn loads_explicit_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("eid-ext.toml");
    let log = dir.path().join("audit.jsonl");
    fs::write(
        &path,
        format!(
            "[issuer]\nentity_id = \"https://idp.example.com\"\n[audit]\nsink = \"file\"\npath = \
             \"{}\"\n",
            log.display()
        ),
    )
    .expect("write");
    let config = EidExtConfig::load(Some(&path)).expect("load");
    assert_eq!(config.audit.sink, AuditSinkKind::File);
    assert_eq!(config.audit.path.as_deref(), Some(log.to_string_lossy().as_ref()));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    assert!(matches!(EidExtConfig::load(Some(&path)), Err(ConfigError::Io(_))));
}

#[test]
fn oversized_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("big.toml");
    let mut content = String::from("[issuer]\nentity_id = \"https://idp.example.com\"\n");
    content.push_str(&"#".repeat(1024 * 1024));
    fs::write(&path, content).expect("write");
    let err = EidExtConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("size limit"));
}

#[test]
fn non_utf8_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, [0xff, 0xfe, 0x00]).expect("write");
    let err = EidExtConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("utf-8"));
}

#[test]
fn overlong_path_component_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(format!("{}.toml", "c".repeat(300)));
    let err = EidExtConfig::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("component too long"));
}

#[test]
fn explicit_path_takes_precedence_over_environment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let explicit = dir.path().join("explicit.toml");
    let from_env = dir.path().join("from-env.toml");
    let resolved =
        resolve_config_path(Some(&explicit), Some(from_env.to_string_lossy().into_owned()))
            .expect("resolve");
    assert_eq!(resolved, explicit);
}

#[test]
fn environment_path_is_used_without_explicit_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("from-env.toml");
    fs::write(&path, "[issuer]\nentity_id = \"https://idp.example.com/env\"\n").expect("write");
    let resolved =
        resolve_config_path(None, Some(path.to_string_lossy().into_owned())).expect("resolve");
    assert_eq!(resolved, path);
    let config = EidExtConfig::load(Some(&resolved)).expect("load");
    assert_eq!(config.issuer.entity_id, "https://idp.example.com/env");
}

#[test]
fn default_file_name_is_used_last() {
    let resolved = resolve_config_path(None, None).expect("resolve");
    assert_eq!(resolved, PathBuf::from(DEFAULT_CONFIG_NAME));

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(&resolved);
    fs::write(&path, "[issuer]\nentity_id = \"https://idp.example.com/default\"\n")
        .expect("write");
    let config = EidExtConfig::load(Some(&path)).expect("load");
    assert_eq!(config.issuer.entity_id, "https://idp.example.com/default");
}

#[test]
fn overlong_environment_path_is_rejected() {
    let env_path = format!("/{}", "d/".repeat(2100));
    let err = resolve_config_path(None, Some(env_path)).unwrap_err();
    assert!(matches!(&err, ConfigError::Invalid(message) if message.contains("max length")));
}
