// crates/eid-ext-core/src/core/loa.rs
// ============================================================================
// Module: Level of Assurance Registry
// Description: Swedish eID Framework LoA URIs and their rank algebra.
// Purpose: Resolve LoA ranks and flip between plain and sign-message variants.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Each Level of Assurance is identified by a URI with a numeric rank. Ranks
//! 2 through 4 also have a "sigmessage" variant, asserted when the identity
//! provider displayed a sign message to the user. The table is a static
//! array; lookups are linear scans in declaration order.
//!
//! Unknown URIs are not errors: [`level_of`] returns `0` and the transforms
//! return `None`.

// ============================================================================
// SECTION: URIs
// ============================================================================

/// LoA 1 authentication context URI.
pub const LOA1: &str = "http://id.elegnamnden.se/loa/1.0/loa1";
/// LoA 2 authentication context URI.
pub const LOA2: &str = "http://id.elegnamnden.se/loa/1.0/loa2";
/// LoA 2 with a displayed sign message.
pub const LOA2_SIGMESSAGE: &str = "http://id.elegnamnden.se/loa/1.0/loa2-sigmessage";
/// LoA 3 authentication context URI.
pub const LOA3: &str = "http://id.elegnamnden.se/loa/1.0/loa3";
/// LoA 3 with a displayed sign message.
pub const LOA3_SIGMESSAGE: &str = "http://id.elegnamnden.se/loa/1.0/loa3-sigmessage";
/// LoA 4 authentication context URI.
pub const LOA4: &str = "http://id.elegnamnden.se/loa/1.0/loa4";
/// LoA 4 with a displayed sign message.
pub const LOA4_SIGMESSAGE: &str = "http://id.elegnamnden.se/loa/1.0/loa4-sigmessage";

// ============================================================================
// SECTION: Registry Entries
// ============================================================================

/// One row of the LoA table.
///
/// # Invariants
/// - `rank` is in `1..=4`.
/// - For a given rank, the plain and signature-variant URIs differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssuranceLevel {
    /// Numeric rank; higher is stronger.
    pub rank: u8,
    /// Authentication context class URI.
    pub uri: &'static str,
    /// True for the sign-message variant of the rank.
    pub is_signature_variant: bool,
}

/// Reference LoA table in declaration order.
static ENTRIES: [AssuranceLevel; 7] = [
    AssuranceLevel {
        rank: 1,
        uri: LOA1,
        is_signature_variant: false,
    },
    AssuranceLevel {
        rank: 2,
        uri: LOA2,
        is_signature_variant: false,
    },
    AssuranceLevel {
        rank: 2,
        uri: LOA2_SIGMESSAGE,
        is_signature_variant: true,
    },
    AssuranceLevel {
        rank: 3,
        uri: LOA3,
        is_signature_variant: false,
    },
    AssuranceLevel {
        rank: 3,
        uri: LOA3_SIGMESSAGE,
        is_signature_variant: true,
    },
    AssuranceLevel {
        rank: 4,
        uri: LOA4,
        is_signature_variant: false,
    },
    AssuranceLevel {
        rank: 4,
        uri: LOA4_SIGMESSAGE,
        is_signature_variant: true,
    },
];

// ============================================================================
// SECTION: Lookups
// ============================================================================

/// Returns every registered level in declaration order.
#[must_use]
pub fn entries() -> &'static [AssuranceLevel] {
    &ENTRIES
}

/// Returns the entry registered for `uri`.
#[must_use]
pub fn lookup(uri: &str) -> Option<&'static AssuranceLevel> {
    ENTRIES.iter().find(|entry| entry.uri == uri)
}

/// Returns the rank for `uri`, or `0` when the URI is not registered.
#[must_use]
pub fn level_of(uri: &str) -> u8 {
    lookup(uri).map_or(0, |entry| entry.rank)
}

/// Returns the plain URI for `rank`.
#[must_use]
pub fn plain_uri_for_level(rank: u8) -> Option<&'static str> {
    find_variant(rank, false)
}

/// Returns the sign-message variant URI for `rank`.
#[must_use]
pub fn signature_variant_uri_for_level(rank: u8) -> Option<&'static str> {
    find_variant(rank, true)
}

/// Maps `uri` to the sign-message variant of the same rank.
#[must_use]
pub fn to_signature_variant(uri: &str) -> Option<&'static str> {
    lookup(uri).and_then(|entry| find_variant(entry.rank, true))
}

/// Maps `uri` to the plain variant of the same rank.
#[must_use]
pub fn to_plain(uri: &str) -> Option<&'static str> {
    lookup(uri).and_then(|entry| find_variant(entry.rank, false))
}

/// Returns true when `uri` is a registered sign-message variant.
#[must_use]
pub fn is_signature_variant(uri: &str) -> bool {
    lookup(uri).is_some_and(|entry| entry.is_signature_variant)
}

/// Returns true when `uri` is registered with a rank of at least `minimum`.
#[must_use]
pub fn meets_minimum(uri: &str, minimum: u8) -> bool {
    let rank = level_of(uri);
    rank != 0 && rank >= minimum
}

/// Finds the first entry with the given rank and variant flag.
fn find_variant(rank: u8, signature_variant: bool) -> Option<&'static str> {
    ENTRIES
        .iter()
        .find(|entry| entry.rank == rank && entry.is_signature_variant == signature_variant)
        .map(|entry| entry.uri)
}
