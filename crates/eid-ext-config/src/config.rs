// crates/eid-ext-config/src/config.rs
// ============================================================================
// Module: eID Extensions Configuration
// Description: Configuration loading and validation for SAD processing.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: eid-ext-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then the `EID_EXT_CONFIG` environment
//! variable, then `eid-ext.toml` in the working directory. Every section
//! except `[issuer]` has defaults; out-of-range values are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use eid_ext_core::VersionTag;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "eid-ext.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "EID_EXT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default SAD lifetime in seconds.
pub(crate) const DEFAULT_TTL_SECONDS: u64 = 300;
/// Maximum SAD lifetime in seconds.
pub(crate) const MAX_TTL_SECONDS: u64 = 3600;
/// Default clock skew tolerance in seconds.
pub(crate) const DEFAULT_CLOCK_SKEW_SECONDS: u64 = 60;
/// Maximum clock skew tolerance in seconds.
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 600;
/// Maximum number of supported SAD versions.
pub(crate) const MAX_SUPPORTED_VERSIONS: usize = 16;
/// Default maximum compact token size in bytes.
pub(crate) const DEFAULT_MAX_TOKEN_BYTES: usize = 16 * 1024;
/// Maximum allowed compact token size in bytes.
pub(crate) const MAX_MAX_TOKEN_BYTES: usize = 1024 * 1024;
/// Default maximum XML input size in bytes.
pub(crate) const DEFAULT_MAX_XML_BYTES: usize = 256 * 1024;
/// Maximum allowed XML input size in bytes.
pub(crate) const MAX_MAX_XML_BYTES: usize = 4 * 1024 * 1024;
/// Default maximum XML nesting depth.
pub(crate) const DEFAULT_MAX_XML_DEPTH: usize = 32;
/// Maximum allowed XML nesting depth.
pub(crate) const MAX_MAX_XML_DEPTH: usize = 256;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// eID extensions configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EidExtConfig {
    /// SAD issuer configuration.
    pub issuer: IssuerConfig,
    /// SAD validation configuration.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Input size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl EidExtConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_config_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.issuer.validate()?;
        self.validation.validate()?;
        self.audit.validate()?;
        self.limits.validate()
    }

    /// Returns the issuer a validator should expect.
    ///
    /// Falls back to the local issuer entity when no explicit value is set.
    #[must_use]
    pub fn expected_issuer(&self) -> &str {
        self.validation.expected_issuer.as_deref().unwrap_or(&self.issuer.entity_id)
    }
}

/// SAD issuer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuerConfig {
    /// Entity identifier written into the `iss` claim.
    pub entity_id: String,
    /// SAD lifetime in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    /// SAD versions the issuer can produce.
    #[serde(default = "default_supported_versions")]
    pub supported_versions: Vec<VersionTag>,
}

impl IssuerConfig {
    /// Returns true when `version` is in the supported set.
    #[must_use]
    pub fn supports(&self, version: VersionTag) -> bool {
        self.supported_versions.contains(&version)
    }

    /// Validates issuer configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_entity_id("issuer.entity_id", &self.entity_id)?;
        if self.ttl_seconds == 0 || self.ttl_seconds > MAX_TTL_SECONDS {
            return Err(ConfigError::Invalid(format!(
                "issuer.ttl_seconds must be between 1 and {MAX_TTL_SECONDS}"
            )));
        }
        if self.supported_versions.is_empty() {
            return Err(ConfigError::Invalid(
                "issuer.supported_versions must be non-empty".to_string(),
            ));
        }
        if self.supported_versions.len() > MAX_SUPPORTED_VERSIONS {
            return Err(ConfigError::Invalid(format!(
                "issuer.supported_versions exceeds {MAX_SUPPORTED_VERSIONS} entries"
            )));
        }
        Ok(())
    }
}

/// SAD validation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationConfig {
    /// Issuer expected in the `iss` claim; defaults to `issuer.entity_id`.
    #[serde(default)]
    pub expected_issuer: Option<String>,
    /// Audience expected in the `aud` claim.
    #[serde(default)]
    pub audience: Option<String>,
    /// Tolerated clock difference in seconds.
    #[serde(default = "default_clock_skew_seconds")]
    pub clock_skew_seconds: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            expected_issuer: None,
            audience: None,
            clock_skew_seconds: default_clock_skew_seconds(),
        }
    }
}

impl ValidationConfig {
    /// Validates validation configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(issuer) = &self.expected_issuer {
            validate_entity_id("validation.expected_issuer", issuer)?;
        }
        if let Some(audience) = &self.audience {
            validate_entity_id("validation.audience", audience)?;
        }
        if self.clock_skew_seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(ConfigError::Invalid(format!(
                "validation.clock_skew_seconds must be at most {MAX_CLOCK_SKEW_SECONDS}"
            )));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Audit events are discarded.
    #[serde(rename = "none")]
    Disabled,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink receiving audit events.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log path for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.sink = \"file\" requires audit.path".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid with the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

/// Input size limits.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum compact token size in bytes.
    #[serde(default = "default_max_token_bytes")]
    pub max_token_bytes: usize,
    /// Maximum XML input size in bytes.
    #[serde(default = "default_max_xml_bytes")]
    pub max_xml_bytes: usize,
    /// Maximum XML nesting depth.
    #[serde(default = "default_max_xml_depth")]
    pub max_xml_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_token_bytes: default_max_token_bytes(),
            max_xml_bytes: default_max_xml_bytes(),
            max_xml_depth: default_max_xml_depth(),
        }
    }
}

impl LimitsConfig {
    /// Validates limit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_range("limits.max_token_bytes", self.max_token_bytes, MAX_MAX_TOKEN_BYTES)?;
        validate_range("limits.max_xml_bytes", self.max_xml_bytes, MAX_MAX_XML_BYTES)?;
        validate_range("limits.max_xml_depth", self.max_xml_depth, MAX_MAX_XML_DEPTH)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default SAD lifetime.
const fn default_ttl_seconds() -> u64 {
    DEFAULT_TTL_SECONDS
}

/// Default supported versions.
fn default_supported_versions() -> Vec<VersionTag> {
    vec![VersionTag::V1_0]
}

/// Default clock skew.
const fn default_clock_skew_seconds() -> u64 {
    DEFAULT_CLOCK_SKEW_SECONDS
}

/// Default token size limit.
const fn default_max_token_bytes() -> usize {
    DEFAULT_MAX_TOKEN_BYTES
}

/// Default XML size limit.
const fn default_max_xml_bytes() -> usize {
    DEFAULT_MAX_XML_BYTES
}

/// Default XML depth limit.
const fn default_max_xml_depth() -> usize {
    DEFAULT_MAX_XML_DEPTH
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the config path: the caller's path, then `env_path` (the value
/// of [`CONFIG_ENV_VAR`]), then [`DEFAULT_CONFIG_NAME`].
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when `env_path` exceeds the path length
/// limit.
pub fn resolve_config_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates that an entity identifier is an absolute URI.
fn validate_entity_id(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim() != value || value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be a non-empty trimmed uri")));
    }
    Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("{field} is not an absolute uri: {err}")))?;
    Ok(())
}

/// Validates that a limit lies within `1..=max`.
fn validate_range(field: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between 1 and {max}")));
    }
    Ok(())
}
