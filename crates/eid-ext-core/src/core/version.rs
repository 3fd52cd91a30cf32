// crates/eid-ext-core/src/core/version.rs
// ============================================================================
// Module: Protocol Version Tags
// Description: Typed major.minor version identifiers for SAP and SAD.
// Purpose: Provide value-equal, canonical-string version values.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Signature Activation Protocol messages carry their version as a
//! `"{major}.{minor}"` string. [`VersionTag`] is the typed form of that string.
//! Equality is value equality; [`VersionTag::V1_0`] is a convenience constant,
//! not an identity requirement.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

// ============================================================================
// SECTION: Version Tag
// ============================================================================

/// Major/minor protocol version.
///
/// # Invariants
/// - The canonical string form is always `"{major}.{minor}"`.
/// - Two tags are equal iff both components are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionTag {
    /// Major version component.
    major: u32,
    /// Minor version component.
    minor: u32,
}

impl VersionTag {
    /// Version 1.0, the only SAP/SAD version defined so far.
    pub const V1_0: Self = Self {
        major: 1,
        minor: 0,
    };

    /// Returns the version for the given components.
    #[must_use]
    pub const fn of(major: u32, minor: u32) -> Self {
        if major == 1 && minor == 0 {
            return Self::V1_0;
        }
        Self {
            major,
            minor,
        }
    }

    /// Parses a `"{major}.{minor}"` string.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Malformed`] unless the text holds exactly two
    /// dot-separated unsigned integers.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let malformed = || VersionError::Malformed(text.to_string());
        let mut parts = text.split('.');
        let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let major = parse_component(major).ok_or_else(malformed)?;
        let minor = parse_component(minor).ok_or_else(malformed)?;
        Ok(Self::of(major, minor))
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }
}

impl Default for VersionTag {
    fn default() -> Self {
        Self::V1_0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionTag {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VersionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing version strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The text is not a `major.minor` pair of unsigned integers.
    #[error("malformed version: {0}")]
    Malformed(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses one version component; signs and whitespace are rejected.
fn parse_component(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
