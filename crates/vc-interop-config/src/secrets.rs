// crates/vc-interop-config/src/secrets.rs
// ============================================================================
// Module: Secret Sources
// Description: Named secret lookup for key seeds, client secrets, and tokens.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Auth settings only name the environment variables that hold secrets. A
//! [`SecretSource`] resolves those names at request time. Environment values
//! are read with strict UTF-8 enforcement; invalid UTF-8 or empty values fail
//! closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Secret Source
// ============================================================================

/// Resolves named secrets.
pub trait SecretSource: Send + Sync {
    /// Returns the secret stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] when the secret is unset and
    /// [`ConfigError::Invalid`] when it is malformed.
    fn secret(&self, name: &str) -> Result<String, ConfigError>;
}

/// Process environment secret source.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretSource;

impl SecretSource for EnvSecretSource {
    fn secret(&self, name: &str) -> Result<String, ConfigError> {
        let raw = std::env::var_os(name).ok_or_else(|| ConfigError::MissingEnv(name.to_string()))?;
        let value = raw
            .into_string()
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))?;
        if value.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{name} must not be empty")));
        }
        Ok(value)
    }
}

/// In-memory secret source.
#[derive(Clone, Default)]
pub struct StaticSecretSource {
    /// Secrets keyed by name.
    values: BTreeMap<String, String>,
}

impl StaticSecretSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the source with one more secret.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl fmt::Debug for StaticSecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSecretSource")
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .field("values", &"<redacted>")
            .finish()
    }
}

impl SecretSource for StaticSecretSource {
    fn secret(&self, name: &str) -> Result<String, ConfigError> {
        match self.values.get(name) {
            Some(value) if value.trim().is_empty() => {
                Err(ConfigError::Invalid(format!("{name} must not be empty")))
            }
            Some(value) => Ok(value.clone()),
            None => Err(ConfigError::MissingEnv(name.to_string())),
        }
    }
}
