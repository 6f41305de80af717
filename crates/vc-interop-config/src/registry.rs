// crates/vc-interop-config/src/registry.rs
// ============================================================================
// Module: Implementation Registry
// Description: Named implementation descriptors and tag-based partitioning.
// Purpose: Hold the immutable set of endpoints exercised by interop suites.
// Dependencies: serde, serde_json, toml, url
// ============================================================================

//! ## Overview
//! An [`ImplementationRegistry`] is built once at process start from a config
//! document and threaded by reference to every suite. It never changes after
//! construction.
//!
//! Each [`ImplementationDescriptor`] lists issuer and verifier endpoints. An
//! endpoint carries a tag set (for example `VC-HTTP-API` or `JWT`) that
//! decides which suites it is eligible for, plus an [`AuthConfig`] naming the
//! authorization scheme used to reach it.
//!
//! Invariants:
//! - Implementation names are unique and non-empty.
//! - Endpoint URLs use `http` or `https` and carry no embedded credentials.
//! - Zcap capabilities are stored parsed; JSON text is decoded at load time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ConfigError;
use crate::config::read_config_text;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix of root capability identifiers.
pub const ROOT_CAPABILITY_PREFIX: &str = "urn:zcap:root:";
/// Maximum length of an environment variable name.
const MAX_ENV_VAR_NAME_LENGTH: usize = 128;
/// Maximum length of a tag.
const MAX_TAG_LENGTH: usize = 128;

// ============================================================================
// SECTION: Auth Config
// ============================================================================

/// Authorization scheme used to reach an endpoint.
///
/// Secrets are never stored here; variants name the environment variables
/// that hold them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthConfig {
    /// Capability invocation signed with an Ed25519 key derived from a seed.
    Zcap {
        /// Capability to invoke: a parsed object or a root capability id.
        /// When absent the root capability of the target URL is invoked.
        #[serde(default)]
        capability: Option<Value>,
        /// Environment variable holding the multibase key seed.
        #[serde(alias = "clientSecretEnvVar", alias = "keySeed")]
        client_secret_env_var: String,
    },
    /// OAuth2 client-credentials grant exchanged for a bearer token.
    Oauth2 {
        /// OAuth2 client identifier.
        #[serde(alias = "clientId")]
        client_id: String,
        /// Environment variable holding the client secret.
        #[serde(alias = "clientSecretEnvVar", alias = "clientSecret")]
        client_secret_env_var: String,
        /// Token endpoint URL.
        #[serde(alias = "tokenEndpoint")]
        token_endpoint: Url,
        /// Optional token audience.
        #[serde(default)]
        audience: Option<String>,
    },
    /// Static bearer token.
    Bearer {
        /// Environment variable holding the token.
        #[serde(alias = "tokenEnvVar")]
        token_env_var: String,
    },
    /// No authorization header.
    #[default]
    None,
}

impl AuthConfig {
    /// Returns a stable label for the scheme, safe to log.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::Zcap {
                ..
            } => "zcap",
            Self::Oauth2 {
                ..
            } => "oauth2",
            Self::Bearer {
                ..
            } => "bearer",
            Self::None => "none",
        }
    }

    /// Validates the auth settings and parses capability text in place.
    fn validate(&mut self, field: &str) -> Result<(), ConfigError> {
        match self {
            Self::Zcap {
                capability,
                client_secret_env_var,
            } => {
                validate_env_var_name(&format!("{field}.client_secret_env_var"), client_secret_env_var)?;
                normalize_capability(field, capability)
            }
            Self::Oauth2 {
                client_id,
                client_secret_env_var,
                token_endpoint,
                audience,
            } => {
                if client_id.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!("{field}.client_id must be non-empty")));
                }
                validate_env_var_name(&format!("{field}.client_secret_env_var"), client_secret_env_var)?;
                validate_http_url(&format!("{field}.token_endpoint"), token_endpoint)?;
                if audience.as_deref().is_some_and(|value| value.trim().is_empty()) {
                    return Err(ConfigError::Invalid(format!("{field}.audience must be non-empty")));
                }
                Ok(())
            }
            Self::Bearer {
                token_env_var,
            } => validate_env_var_name(&format!("{field}.token_env_var"), token_env_var),
            Self::None => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Which endpoint list of a descriptor a filter inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    /// Issuer endpoints.
    Issuers,
    /// Verifier endpoints.
    Verifiers,
}

impl EndpointRole {
    /// Returns the config key for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issuers => "issuers",
            Self::Verifiers => "verifiers",
        }
    }
}

/// One issuer or verifier endpoint of an implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Endpoint identifier (typically the issuer DID or a URL).
    pub id: String,
    /// Target URL for POST requests.
    pub endpoint: Url,
    /// Capability tags deciding suite eligibility.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Authorization scheme.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Extra headers merged over the defaults.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Issuer options sent alongside credentials.
    #[serde(default)]
    pub options: Option<Value>,
}

impl EndpointConfig {
    /// Returns true when the endpoint carries every requested tag.
    #[must_use]
    pub fn has_tags(&self, tags: &BTreeSet<String>) -> bool {
        tags.is_subset(&self.tags)
    }

    /// Validates the endpoint and parses capability text in place.
    fn validate(&mut self, field: &str) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("{field}.id must be non-empty")));
        }
        validate_http_url(&format!("{field}.endpoint"), &self.endpoint)?;
        for tag in &self.tags {
            if tag.trim().is_empty() || tag.len() > MAX_TAG_LENGTH {
                return Err(ConfigError::Invalid(format!("{field}.tags contains an invalid tag")));
            }
        }
        for (name, value) in &self.headers {
            if !is_valid_header_name(name) {
                return Err(ConfigError::Invalid(format!("{field}.headers has invalid name {name}")));
            }
            if !is_valid_header_value(value) {
                return Err(ConfigError::Invalid(format!(
                    "{field}.headers has invalid value for {name}"
                )));
            }
        }
        if self.options.as_ref().is_some_and(|options| !options.is_object()) {
            return Err(ConfigError::Invalid(format!("{field}.options must be an object")));
        }
        self.auth.validate(&format!("{field}.auth"))
    }
}

// ============================================================================
// SECTION: Descriptors
// ============================================================================

/// A named implementation under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationDescriptor {
    /// Unique implementation name (report column).
    pub name: String,
    /// Issuer endpoints.
    #[serde(default)]
    pub issuers: Vec<EndpointConfig>,
    /// Verifier endpoints.
    #[serde(default)]
    pub verifiers: Vec<EndpointConfig>,
}

impl ImplementationDescriptor {
    /// Returns the endpoints for a role.
    #[must_use]
    pub fn endpoints(&self, role: EndpointRole) -> &[EndpointConfig] {
        match role {
            EndpointRole::Issuers => &self.issuers,
            EndpointRole::Verifiers => &self.verifiers,
        }
    }

    /// Returns the first endpoint for `role` carrying every tag in `tags`.
    #[must_use]
    pub fn endpoint_with_tags(
        &self,
        role: EndpointRole,
        tags: &BTreeSet<String>,
    ) -> Option<&EndpointConfig> {
        self.endpoints(role).iter().find(|endpoint| endpoint.has_tags(tags))
    }

    /// Returns true when at least one endpoint matches the filter.
    #[must_use]
    pub fn matches(&self, filter: &TagFilter) -> bool {
        self.endpoint_with_tags(filter.role, &filter.tags).is_some()
    }

    /// Validates the descriptor and all of its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any field is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("implementation name is empty".to_string()));
        }
        let name = self.name.clone();
        for (role, endpoints) in
            [(EndpointRole::Issuers, &mut self.issuers), (EndpointRole::Verifiers, &mut self.verifiers)]
        {
            for (index, endpoint) in endpoints.iter_mut().enumerate() {
                endpoint.validate(&format!("{name}.{}[{index}]", role.as_str()))?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Tag Filtering
// ============================================================================

/// Tag filter over one endpoint role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    /// Endpoint list inspected.
    pub role: EndpointRole,
    /// Tags an endpoint must all carry.
    pub tags: BTreeSet<String>,
}

impl TagFilter {
    /// Builds a filter from a role and tag list.
    #[must_use]
    pub fn new<I, S>(role: EndpointRole, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            role,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// Total, disjoint partition of a registry by a [`TagFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagPartition<'a> {
    /// Implementations with at least one matching endpoint.
    pub matched: BTreeMap<&'a str, &'a ImplementationDescriptor>,
    /// Implementations with no matching endpoint.
    pub non_matched: BTreeMap<&'a str, &'a ImplementationDescriptor>,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Immutable set of implementations keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImplementationRegistry {
    /// Descriptors keyed by implementation name.
    entries: BTreeMap<String, ImplementationDescriptor>,
}

/// TOML registry document shape.
#[derive(Debug, Deserialize)]
struct RegistryDocument {
    /// Implementation entries.
    #[serde(default)]
    implementations: Vec<ImplementationDescriptor>,
}

impl ImplementationRegistry {
    /// Builds a registry from descriptors, validating each entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an entry is invalid or two
    /// entries share a name.
    pub fn new(descriptors: Vec<ImplementationDescriptor>) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for mut descriptor in descriptors {
            descriptor.validate()?;
            if entries.contains_key(&descriptor.name) {
                return Err(duplicate_name(&descriptor.name));
            }
            entries.insert(descriptor.name.clone(), descriptor);
        }
        Ok(Self {
            entries,
        })
    }

    /// Loads a registry from a TOML or JSON file (`.json` selects JSON).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_config_text(path)?;
        let is_json =
            path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        if is_json { Self::from_json_str(&content) } else { Self::from_toml_str(&content) }
    }

    /// Parses a registry from TOML text containing `[[implementations]]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let document: RegistryDocument =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        Self::new(document.implementations)
    }

    /// Parses a registry from JSON: an array of descriptors or one
    /// descriptor object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let descriptors = match value {
            Value::Array(_) => serde_json::from_value::<Vec<ImplementationDescriptor>>(value),
            Value::Object(_) => serde_json::from_value::<ImplementationDescriptor>(value)
                .map(|descriptor| vec![descriptor]),
            _ => {
                return Err(ConfigError::Parse(
                    "registry json must be an array or an object".to_string(),
                ));
            }
        }
        .map_err(|err| ConfigError::Parse(err.to_string()))?;
        Self::new(descriptors)
    }

    /// Looks up an implementation by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no entry has that name.
    pub fn get(&self, name: &str) -> Result<&ImplementationDescriptor, ConfigError> {
        self.entries.get(name).ok_or_else(|| ConfigError::NotFound(name.to_string()))
    }

    /// Partitions the registry by whether any endpoint matches the filter.
    #[must_use]
    pub fn filter_by_tag(&self, filter: &TagFilter) -> TagPartition<'_> {
        let mut partition = TagPartition::default();
        for (name, descriptor) in &self.entries {
            if descriptor.matches(filter) {
                partition.matched.insert(name.as_str(), descriptor);
            } else {
                partition.non_matched.insert(name.as_str(), descriptor);
            }
        }
        partition
    }

    /// Returns implementation names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ImplementationDescriptor> {
        self.entries.values()
    }

    /// Returns the number of implementations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no implementations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects descriptor lists with repeated names.
pub(crate) fn ensure_unique_names(descriptors: &[ImplementationDescriptor]) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();
    for descriptor in descriptors {
        if !seen.insert(descriptor.name.as_str()) {
            return Err(duplicate_name(&descriptor.name));
        }
    }
    Ok(())
}

/// Builds the duplicate-name error.
fn duplicate_name(name: &str) -> ConfigError {
    ConfigError::Invalid(format!("duplicate implementation name: {name}"))
}

/// Validates an endpoint URL scheme and rejects embedded credentials.
fn validate_http_url(field: &str, url: &Url) -> Result<(), ConfigError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!("{field} must use http or https")));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::Invalid(format!("{field} must include a host")));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(format!("{field} must not embed credentials")));
    }
    Ok(())
}

/// Validates an environment variable name.
fn validate_env_var_name(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() || name.len() > MAX_ENV_VAR_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} must be a non-empty variable name")));
    }
    if name.contains(['=', '\0']) || name.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} is not a valid variable name")));
    }
    Ok(())
}

/// Parses capability JSON text and checks the capability shape.
fn normalize_capability(field: &str, capability: &mut Option<Value>) -> Result<(), ConfigError> {
    let parsed = match capability.take() {
        None => None,
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.starts_with(ROOT_CAPABILITY_PREFIX) {
                Some(Value::String(trimmed.to_string()))
            } else {
                let value: Value = serde_json::from_str(trimmed).map_err(|err| {
                    ConfigError::Invalid(format!("{field}.capability is not valid json: {err}"))
                })?;
                Some(value)
            }
        }
        Some(value) => Some(value),
    };
    match &parsed {
        None | Some(Value::Object(_)) => {}
        Some(Value::String(id)) if id.starts_with(ROOT_CAPABILITY_PREFIX) => {}
        Some(_) => {
            return Err(ConfigError::Invalid(format!(
                "{field}.capability must be an object or a root capability id"
            )));
        }
    }
    *capability = parsed;
    Ok(())
}

/// Returns true when `name` is an RFC 9110 header field name.
pub(crate) fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|byte| {
            byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
        })
}

/// Returns true when `value` is a visible ASCII header field value.
pub(crate) fn is_valid_header_value(value: &str) -> bool {
    value.bytes().all(|byte| byte == b'\t' || (0x20..0x7f).contains(&byte))
}
