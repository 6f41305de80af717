// crates/vc-interop-client/src/oauth2.rs
// ============================================================================
// Module: OAuth2 Token Exchange
// Description: Client-credentials token acquisition with bounded retries.
// Purpose: Obtain bearer tokens for OAuth2-protected interop endpoints.
// Dependencies: reqwest, serde, serde_urlencoded
// ============================================================================

//! ## Overview
//! Tokens are requested with the `client_credentials` grant as a form POST.
//! Any transport failure, non-2xx status, oversized body, or response without
//! an `access_token` counts as a failed attempt. Attempts are independent
//! and run back to back; after `max_retries + 1` failures the exchange fails
//! with [`ClientError::Auth`].
//!
//! Security posture: the client secret and issued token are never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::audit::InteropAuditSink;
use crate::audit::TokenRequestEvent;
use crate::audit::TokenRequestEventParams;
use crate::client::ClientError;
use crate::client::read_response_body_with_limit;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Client-credentials token request.
#[derive(Clone)]
pub struct TokenRequest<'a> {
    /// Token endpoint URL.
    pub token_endpoint: &'a Url,
    /// OAuth2 client identifier.
    pub client_id: &'a str,
    /// OAuth2 client secret.
    pub client_secret: &'a str,
    /// Optional token audience.
    pub audience: Option<&'a str>,
}

impl fmt::Debug for TokenRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("token_endpoint", &self.token_endpoint.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}

/// Form body of a client-credentials grant.
#[derive(Serialize)]
struct TokenForm<'a> {
    /// Grant type (`client_credentials`).
    grant_type: &'static str,
    /// Client identifier.
    client_id: &'a str,
    /// Client secret.
    client_secret: &'a str,
    /// Optional audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    audience: Option<&'a str>,
}

/// Token endpoint response fields used by the harness.
#[derive(Deserialize)]
struct TokenResponse {
    /// Issued access token.
    access_token: String,
}

// ============================================================================
// SECTION: Token Exchange
// ============================================================================

/// Exchanges client credentials for an access token.
///
/// Makes at most `max_retries + 1` attempts.
///
/// # Errors
///
/// Returns [`ClientError::Auth`] when every attempt fails, or
/// [`ClientError::Json`] when the form body cannot be encoded.
pub async fn fetch_access_token(
    http: &Client,
    request: &TokenRequest<'_>,
    max_retries: u32,
    max_response_bytes: usize,
    audit: &dyn InteropAuditSink,
) -> Result<String, ClientError> {
    let form = serde_urlencoded::to_string(TokenForm {
        grant_type: "client_credentials",
        client_id: request.client_id,
        client_secret: request.client_secret,
        audience: request.audience,
    })
    .map_err(|err| ClientError::Json(format!("token form encoding failed: {err}")))?;
    let max_attempts = max_retries.saturating_add(1);
    let mut last_error = String::new();
    for attempt in 1..=max_attempts {
        let result = attempt_token(http, request.token_endpoint, &form, max_response_bytes).await;
        audit.record_token(&TokenRequestEvent::new(TokenRequestEventParams {
            token_endpoint: request.token_endpoint.to_string(),
            attempt,
            max_attempts,
            error: result.as_ref().err().cloned(),
        }));
        match result {
            Ok(token) => return Ok(token),
            Err(error) => last_error = error,
        }
    }
    Err(ClientError::Auth(format!(
        "token request to {} failed after {max_attempts} attempts: {last_error}",
        request.token_endpoint
    )))
}

/// Performs one token request attempt.
async fn attempt_token(
    http: &Client,
    token_endpoint: &Url,
    form: &str,
    max_response_bytes: usize,
) -> Result<String, String> {
    let response = http
        .post(token_endpoint.clone())
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, "application/json")
        .body(form.to_string())
        .send()
        .await
        .map_err(|err| format!("transport error: {err}"))?;
    let status = response.status();
    let body = read_response_body_with_limit(response, max_response_bytes)
        .await
        .map_err(|err| err.to_string())?;
    if !status.is_success() {
        return Err(format!("http status {}", status.as_u16()));
    }
    let parsed: TokenResponse = serde_json::from_slice(&body)
        .map_err(|err| format!("invalid token response: {err}"))?;
    if parsed.access_token.trim().is_empty() {
        return Err("token response has empty access_token".to_string());
    }
    Ok(parsed.access_token)
}
