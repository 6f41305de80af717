// crates/vc-interop-config/src/config.rs
// ============================================================================
// Module: VC Interop Configuration
// Description: Configuration loading and validation for the interop harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, vc-interop-mutation
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The file carries HTTP client settings, the suite validation profile, and
//! the list of implementations under test. Missing or invalid configuration
//! fails closed; nothing is defaulted silently beyond the documented values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use vc_interop_mutation::DataModel;
use vc_interop_mutation::ValidationProfile;

use crate::registry::ImplementationDescriptor;
use crate::registry::ImplementationRegistry;
use crate::registry::ensure_unique_names;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "vc-interop.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "VC_INTEROP_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default request timeout in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Maximum request timeout in milliseconds.
const MAX_TIMEOUT_MS: u64 = 300_000;
/// Default maximum response body size in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Maximum configurable response body size in bytes.
const MAX_RESPONSE_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Default number of token request retries after the first attempt.
const DEFAULT_TOKEN_MAX_RETRIES: u32 = 3;
/// Maximum number of token request retries.
pub(crate) const MAX_TOKEN_RETRIES: u32 = 10;
/// Maximum user agent length.
const MAX_USER_AGENT_LENGTH: usize = 256;

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Top-level interop harness configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteropConfig {
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientSettings,
    /// Suite validation settings.
    #[serde(default)]
    pub suite: SuiteSettings,
    /// Implementations under test.
    #[serde(default)]
    pub implementations: Vec<ImplementationDescriptor>,
}

impl InteropConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        let content = read_config_text(&resolved)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// Endpoint capability text is parsed in place, so validation takes
    /// `&mut self`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.client.validate()?;
        for implementation in &mut self.implementations {
            implementation.validate()?;
        }
        ensure_unique_names(&self.implementations)?;
        if let Some(issuer_name) = &self.suite.issuer_name
            && !self.implementations.iter().any(|entry| &entry.name == issuer_name)
        {
            return Err(ConfigError::Invalid(format!(
                "suite.issuer_name {issuer_name} is not a configured implementation"
            )));
        }
        Ok(())
    }

    /// Builds the read-only implementation registry for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an implementation entry is invalid.
    pub fn registry(&self) -> Result<ImplementationRegistry, ConfigError> {
        ImplementationRegistry::new(self.implementations.clone())
    }
}

/// HTTP client settings shared by every outbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Request timeout in milliseconds (connect plus response).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Token request retries after the first attempt.
    #[serde(default = "default_token_max_retries")]
    pub token_max_retries: u32,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ClientSettings {
    /// Returns the request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates client settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "client.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "client.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES_LIMIT}"
            )));
        }
        if self.token_max_retries > MAX_TOKEN_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "client.token_max_retries must be at most {MAX_TOKEN_RETRIES}"
            )));
        }
        let agent = self.user_agent.trim();
        if agent.is_empty() || agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(
                "client.user_agent must be non-empty and at most 256 bytes".to_string(),
            ));
        }
        if !crate::registry::is_valid_header_value(agent) {
            return Err(ConfigError::Invalid(
                "client.user_agent is not a valid header value".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            token_max_retries: default_token_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

/// Suite validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuiteSettings {
    /// Credential data model targeted by verifier suites.
    #[serde(default)]
    pub data_model: DataModel,
    /// Require `verified: false` in rejection bodies.
    #[serde(default)]
    pub require_verified_false: bool,
    /// Implementation whose issuer mints credentials for the JWT suite.
    #[serde(default)]
    pub issuer_name: Option<String>,
}

impl SuiteSettings {
    /// Returns the validation profile for verifier suites.
    #[must_use]
    pub const fn profile(&self) -> ValidationProfile {
        ValidationProfile {
            data_model: self.data_model,
            require_verified_false: self.require_verified_false,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading, validation, and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML or JSON parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// A required secret environment variable is unset.
    #[error("missing environment variable: {0}")]
    MissingEnv(String),
    /// No implementation is registered under the requested name.
    #[error("implementation not found: {0}")]
    NotFound(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the default request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Returns the default maximum response size.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Returns the default token retry count.
const fn default_token_max_retries() -> u32 {
    DEFAULT_TOKEN_MAX_RETRIES
}

/// Returns the default user agent.
fn default_user_agent() -> String {
    format!("vc-interop/{}", env!("CARGO_PKG_VERSION"))
}

/// Resolves the config path from the argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a config path against security limits.
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

/// Reads a config file as UTF-8 text, enforcing path and size limits.
pub(crate) fn read_config_text(path: &Path) -> Result<String, ConfigError> {
    validate_path(path)?;
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    String::from_utf8(bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))
}
