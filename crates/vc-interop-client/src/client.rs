// crates/vc-interop-client/src/client.rs
// ============================================================================
// Module: Authorized Request Builder
// Description: Authenticated JSON POSTs to issuer and verifier endpoints.
// Purpose: Apply zcap, OAuth2, bearer, or no auth and classify responses.
// Dependencies: reqwest, serde_json, vc-interop-config
// ============================================================================

//! ## Overview
//! [`InteropClient`] sends one JSON POST per call, authorized according to
//! the endpoint's [`AuthConfig`]. Non-2xx responses are returned as
//! [`RequestOutcome::Rejected`] values; only configuration, auth, and
//! transport failures are errors. The verify and issue calls are never
//! retried; only OAuth2 token acquisition retries.
//!
//! Security posture: TLS certificate verification is disabled for every
//! request so self-signed test deployments can be reached. This client is
//! for interoperability testing only and must not be used in production.
//! Response bodies are size-limited and secrets are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use url::Url;
use vc_interop_config::AuthConfig;
use vc_interop_config::ClientSettings;
use vc_interop_config::ConfigError;
use vc_interop_config::EndpointConfig;
use vc_interop_config::EnvSecretSource;
use vc_interop_config::SecretSource;

use crate::audit::EndpointRequestEvent;
use crate::audit::EndpointRequestEventParams;
use crate::audit::InteropAuditSink;
use crate::audit::NoopAuditSink;
use crate::oauth2::TokenRequest;
use crate::oauth2::fetch_access_token;
use crate::outcome::RequestOutcome;
use crate::zcap::CAPABILITY_INVOCATION_HEADER;
use crate::zcap::DIGEST_HEADER;
use crate::zcap::InvocationRequest;
use crate::zcap::InvocationSigner;
use crate::zcap::WRITE_ACTION;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default `Accept` header for interop requests.
pub const DEFAULT_ACCEPT: &str = "application/ld+json,application/json";
/// Default `Content-Type` header for interop requests.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures that abort a request before a service response is classified.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing secret or invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Token acquisition or signature construction failed.
    #[error("auth error: {0}")]
    Auth(String),
    /// Connection, DNS, TLS, or timeout failure.
    #[error("network error: {0}")]
    Network(String),
    /// Request body serialization failed.
    #[error("json error: {0}")]
    Json(String),
    /// Response body exceeded the configured limit.
    #[error("response too large: {actual} bytes exceeds limit {limit}")]
    ResponseTooLarge {
        /// Bytes read before aborting.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Authorized HTTP client for interop endpoints.
pub struct InteropClient {
    /// Underlying HTTP client.
    http: Client,
    /// Client settings.
    settings: ClientSettings,
    /// Secret resolver for seeds, client secrets, and tokens.
    secrets: Arc<dyn SecretSource>,
    /// Audit sink for request events.
    audit: Arc<dyn InteropAuditSink>,
}

impl InteropClient {
    /// Builds a client that reads secrets from the process environment and
    /// discards audit events.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] when the HTTP client cannot be built.
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .redirect(Policy::none())
            .danger_accept_invalid_certs(true)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Ok(Self {
            http,
            settings: settings.clone(),
            secrets: Arc::new(EnvSecretSource),
            audit: Arc::new(NoopAuditSink),
        })
    }

    /// Replaces the secret source.
    #[must_use]
    pub fn with_secrets(mut self, secrets: Arc<dyn SecretSource>) -> Self {
        self.secrets = secrets;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn InteropAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the client settings.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Returns the audit sink.
    #[must_use]
    pub fn audit(&self) -> &dyn InteropAuditSink {
        self.audit.as_ref()
    }

    /// Verifies a credential at a verifier endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on configuration, auth, or transport failure.
    pub async fn verify(
        &self,
        verifier: &EndpointConfig,
        credential: &Value,
    ) -> Result<RequestOutcome, ClientError> {
        let body = verification_body(credential);
        self.post(&verifier.endpoint, &body, &verifier.auth, &verifier.headers).await
    }

    /// Issues a credential at an issuer endpoint.
    ///
    /// `options` defaults to the endpoint's configured options, then `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on configuration, auth, or transport failure.
    pub async fn issue(
        &self,
        issuer: &EndpointConfig,
        credential: &Value,
        options: Option<&Value>,
    ) -> Result<RequestOutcome, ClientError> {
        let options = options.or(issuer.options.as_ref());
        let body = issuance_body(credential, options);
        self.post(&issuer.endpoint, &body, &issuer.auth, &issuer.headers).await
    }

    /// Sends one authorized JSON POST.
    ///
    /// Endpoint headers are merged over the defaults; auth headers are
    /// applied last.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on configuration, auth, or transport failure.
    /// Non-2xx responses are returned as [`RequestOutcome::Rejected`].
    pub async fn post(
        &self,
        endpoint: &Url,
        body: &Value,
        auth: &AuthConfig,
        extra_headers: &BTreeMap<String, String>,
    ) -> Result<RequestOutcome, ClientError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ClientError::Json(format!("request serialization failed: {err}")))?;
        let request_bytes = payload.len();
        let started = Instant::now();
        let result = self.send(endpoint, payload, auth, extra_headers).await;
        let (status, error) = match &result {
            Ok(outcome) => (Some(outcome.status()), None),
            Err(err) => (None, Some(err.to_string())),
        };
        self.audit.record_request(&EndpointRequestEvent::new(EndpointRequestEventParams {
            endpoint: endpoint.to_string(),
            auth_scheme: auth.scheme(),
            status,
            error,
            duration_ms: started.elapsed().as_millis(),
            request_bytes,
        }));
        result
    }

    /// Builds headers, authorizes, sends, and classifies one request.
    async fn send(
        &self,
        endpoint: &Url,
        payload: Vec<u8>,
        auth: &AuthConfig,
        extra_headers: &BTreeMap<String, String>,
    ) -> Result<RequestOutcome, ClientError> {
        let mut headers = default_headers();
        merge_headers(&mut headers, extra_headers)?;
        self.authorize(&mut headers, endpoint, &payload, auth).await?;
        let response = self
            .http
            .post(endpoint.clone())
            .headers(headers)
            .body(payload)
            .send()
            .await
            .map_err(|err| ClientError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = read_response_body_with_limit(response, self.settings.max_response_bytes).await?;
        Ok(RequestOutcome::from_parts(status, &body))
    }

    /// Applies the auth scheme to the request headers.
    async fn authorize(
        &self,
        headers: &mut HeaderMap,
        endpoint: &Url,
        payload: &[u8],
        auth: &AuthConfig,
    ) -> Result<(), ClientError> {
        match auth {
            AuthConfig::None => Ok(()),
            AuthConfig::Bearer {
                token_env_var,
            } => {
                let token = self.secrets.secret(token_env_var)?;
                insert_bearer(headers, &token)
            }
            AuthConfig::Oauth2 {
                client_id,
                client_secret_env_var,
                token_endpoint,
                audience,
            } => {
                let client_secret = self.secrets.secret(client_secret_env_var)?;
                let request = TokenRequest {
                    token_endpoint,
                    client_id,
                    client_secret: &client_secret,
                    audience: audience.as_deref(),
                };
                let token = fetch_access_token(
                    &self.http,
                    &request,
                    self.settings.token_max_retries,
                    self.settings.max_response_bytes,
                    self.audit.as_ref(),
                )
                .await?;
                insert_bearer(headers, &token)
            }
            AuthConfig::Zcap {
                capability,
                client_secret_env_var,
            } => {
                let seed = self.secrets.secret(client_secret_env_var)?;
                let signer = InvocationSigner::from_seed(&seed)?;
                let signed = signer.sign_request(&InvocationRequest {
                    url: endpoint,
                    method: "post",
                    body: payload,
                    capability: capability.as_ref(),
                    action: WRITE_ACTION,
                    created: unix_seconds(),
                })?;
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
                headers.insert(AUTHORIZATION, auth_header_value(&signed.authorization)?);
                headers.insert(
                    HeaderName::from_static(CAPABILITY_INVOCATION_HEADER),
                    auth_header_value(&signed.capability_invocation)?,
                );
                headers.insert(HeaderName::from_static(DIGEST_HEADER), auth_header_value(&signed.digest)?);
                Ok(())
            }
        }
    }
}

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// Builds a verifier request body requesting proof checks.
#[must_use]
pub fn verification_body(credential: &Value) -> Value {
    json!({
        "verifiableCredential": credential,
        "options": {
            "checks": ["proof"],
        },
    })
}

/// Builds an issuer request body.
#[must_use]
pub fn issuance_body(credential: &Value, options: Option<&Value>) -> Value {
    json!({
        "credential": credential,
        "options": options.cloned().unwrap_or_else(|| json!({})),
    })
}

// ============================================================================
// SECTION: Header Helpers
// ============================================================================

/// Returns the default JSON request headers.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers
}

/// Merges endpoint headers over the defaults.
fn merge_headers(
    headers: &mut HeaderMap,
    extra_headers: &BTreeMap<String, String>,
) -> Result<(), ClientError> {
    for (name, value) in extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::Invalid(format!("invalid header name {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::Invalid(format!("invalid value for header {name}")))?;
        headers.insert(name, value);
    }
    Ok(())
}

/// Inserts an `Authorization: Bearer` header.
fn insert_bearer(headers: &mut HeaderMap, token: &str) -> Result<(), ClientError> {
    headers.insert(AUTHORIZATION, auth_header_value(&format!("Bearer {}", token.trim()))?);
    Ok(())
}

/// Builds a sensitive header value from auth material.
fn auth_header_value(value: &str) -> Result<HeaderValue, ClientError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| ClientError::Auth("auth material is not a valid header value".to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Returns the current time in whole seconds since epoch.
fn unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Reads a response body while enforcing a hard byte limit.
pub(crate) async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ClientError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| ClientError::Network(err.to_string()))?
    {
        let next_total = total.checked_add(chunk.len()).ok_or(ClientError::ResponseTooLarge {
            actual: usize::MAX,
            limit,
        })?;
        if next_total > limit {
            return Err(ClientError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}
