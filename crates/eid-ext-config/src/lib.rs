// crates/eid-ext-config/src/lib.rs
// ============================================================================
// Module: eID Extensions Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for eid-ext.toml semantics.
// Dependencies: eid-ext-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `eid-ext-config` defines the configuration consumed by the SAD issuer and
//! validator. Validation is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
