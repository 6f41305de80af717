// system-tests/tests/helpers/stubs.rs
// ============================================================================
// Module: Stub Services
// Description: Local verifier, issuer, and token endpoint stubs.
// Purpose: Exercise the suite runner offline against known behaviour.
// Dependencies: tiny_http, serde_json, vc-interop-config
// ============================================================================

//! ## Overview
//! Each stub runs a `tiny_http` server on a loopback port, records every
//! request, and answers through a responder closure. The conforming
//! verifier applies the structural checks the verifier catalog probes.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io::Read;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;
use vc_interop_config::AuthConfig;
use vc_interop_config::EndpointConfig;

// ============================================================================
// SECTION: Recording Server
// ============================================================================

/// One request captured by a stub.
#[derive(Debug, Clone)]
pub struct StubRequest {
    /// Request path and query.
    pub url: String,
    /// Headers keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl StubRequest {
    /// Returns a header value by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Parses the body as JSON, or `Null` when it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// Status returned when a request body cannot be read in full.
pub const BODY_READ_FAILURE_STATUS: u16 = 500;

/// Reads a full request body; a truncated read is an error, never a short body.
pub fn read_request_body(reader: &mut dyn Read) -> Result<Vec<u8>, String> {
    let mut body = Vec::new();
    reader.read_to_end(&mut body).map_err(|err| format!("failed to read request body: {err}"))?;
    Ok(body)
}

/// Responder signature: request plus zero-based request index.
type Responder = dyn Fn(&StubRequest, usize) -> (u16, Value) + Send + Sync;

/// Handle for a running stub service.
pub struct StubService {
    /// Base URL of the stub.
    base: Url,
    /// Captured requests.
    requests: Arc<Mutex<Vec<StubRequest>>>,
    /// Server handle used to unblock the worker.
    server: Arc<Server>,
    /// Worker thread.
    join: Option<thread::JoinHandle<()>>,
}

impl StubService {
    /// Spawns a stub answering with `responder`.
    pub fn spawn<F>(responder: F) -> Result<Self, String>
    where
        F: Fn(&StubRequest, usize) -> (u16, Value) + Send + Sync + 'static,
    {
        let server = Arc::new(
            Server::http("127.0.0.1:0").map_err(|err| format!("failed to bind stub: {err}"))?,
        );
        let addr = server.server_addr().to_ip().ok_or("stub is not bound to an ip address")?;
        let base = Url::parse(&format!("http://{addr}")).map_err(|err| err.to_string())?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responder: Box<Responder> = Box::new(responder);
        let worker_server = Arc::clone(&server);
        let worker_requests = Arc::clone(&requests);
        let join = thread::spawn(move || {
            while let Ok(mut request) = worker_server.recv() {
                let body = match read_request_body(request.as_reader()) {
                    Ok(body) => body,
                    Err(message) => {
                        let response = Response::from_string(json!({"error": message}).to_string())
                            .with_status_code(BODY_READ_FAILURE_STATUS);
                        let _ = request.respond(response);
                        continue;
                    }
                };
                let recorded = StubRequest {
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|header| {
                            (
                                header.field.as_str().as_str().to_ascii_lowercase(),
                                header.value.as_str().to_string(),
                            )
                        })
                        .collect(),
                    body,
                };
                let index = worker_requests.lock().map_or(0, |mut entries| {
                    entries.push(recorded.clone());
                    entries.len() - 1
                });
                let (status, payload) = responder(&recorded, index);
                let mut response = Response::from_string(payload.to_string()).with_status_code(status);
                if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
                    response = response.with_header(header);
                }
                let _ = request.respond(response);
            }
        });
        Ok(Self {
            base,
            requests,
            server,
            join: Some(join),
        })
    }

    /// Returns the URL for a path on this stub.
    pub fn url(&self, path: &str) -> Url {
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }

    /// Returns captured requests.
    pub fn requests(&self) -> Vec<StubRequest> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

// ============================================================================
// SECTION: Verifier Stubs
// ============================================================================

/// Spawns a verifier that enforces the credential shape rules.
pub fn conforming_verifier(allow_context_objects: bool) -> Result<StubService, String> {
    StubService::spawn(move |request, _| {
        let body = request.json();
        let errors = body
            .get("verifiableCredential")
            .map_or_else(|| vec!["verifiableCredential is required".to_string()], |credential| {
                credential_errors(credential, allow_context_objects)
            });
        if errors.is_empty() {
            (200, json!({"verified": true, "checks": ["proof"], "errors": []}))
        } else {
            (400, json!({"verified": false, "errors": errors}))
        }
    })
}

/// Spawns a verifier that accepts every request.
pub fn permissive_verifier() -> Result<StubService, String> {
    StubService::spawn(|_, _| (200, json!({"verified": true})))
}

/// Spawns a verifier that rejects malformed credentials with a bare 400.
pub fn terse_verifier() -> Result<StubService, String> {
    StubService::spawn(|request, _| {
        let errors = request
            .json()
            .get("verifiableCredential")
            .map_or_else(|| vec!["missing".to_string()], |credential| credential_errors(credential, false));
        if errors.is_empty() { (200, json!({"verified": true})) } else { (400, json!({"error": "bad request"})) }
    })
}

/// Returns the structural problems of a credential.
pub fn credential_errors(credential: &Value, allow_context_objects: bool) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(object) = credential.as_object() else {
        return vec!["credential must be an object".to_string()];
    };
    match object.get("@context").and_then(Value::as_array) {
        Some(items)
            if !items.is_empty()
                && items
                    .iter()
                    .all(|item| item.is_string() || (allow_context_objects && item.is_object())) => {}
        _ => errors.push("@context must be an array of strings".to_string()),
    }
    match object.get("type").and_then(Value::as_array) {
        Some(items) if !items.is_empty() && items.iter().all(Value::is_string) => {}
        _ => errors.push("type must be an array of strings".to_string()),
    }
    if !object.get("issuer").is_some_and(|issuer| issuer.is_string() || issuer.is_object()) {
        errors.push("issuer must be a string or an object".to_string());
    }
    if !object.get("credentialSubject").is_some_and(Value::is_object) {
        errors.push("credentialSubject must be an object".to_string());
    }
    match object.get("proof").and_then(Value::as_object) {
        Some(proof) => {
            for field in ["type", "created", "verificationMethod", "proofValue", "proofPurpose"] {
                if !proof.get(field).is_some_and(Value::is_string) {
                    errors.push(format!("proof.{field} is required"));
                }
            }
        }
        None => errors.push("proof must be an object".to_string()),
    }
    errors
}

// ============================================================================
// SECTION: Issuer And Token Stubs
// ============================================================================

/// Spawns an issuer that signs any credential object it receives.
///
/// When `required_bearer` is set, requests without that bearer token get 401.
pub fn signing_issuer(required_bearer: Option<&'static str>) -> Result<StubService, String> {
    StubService::spawn(move |request, _| {
        if let Some(token) = required_bearer {
            if request.header("authorization") != Some(format!("Bearer {token}").as_str()) {
                return (401, json!({"error": "unauthorized"}));
            }
        }
        let Some(mut credential) = request.json().get("credential").filter(|value| value.is_object()).cloned()
        else {
            return (400, json!({"error": "credential is required"}));
        };
        if let Some(object) = credential.as_object_mut() {
            object.insert(
                "proof".to_string(),
                json!({
                    "type": "Ed25519Signature2020",
                    "created": "2024-01-01T00:00:00Z",
                    "verificationMethod": "did:key:z6MkStubIssuer#z6MkStubIssuer",
                    "proofPurpose": "assertionMethod",
                    "proofValue": "z3stub",
                }),
            );
        }
        (201, json!({"verifiableCredential": credential}))
    })
}

/// Spawns an OAuth2 token endpoint that issues `token`.
pub fn token_endpoint(token: &'static str) -> Result<StubService, String> {
    StubService::spawn(move |_, _| (200, json!({"access_token": token, "token_type": "Bearer"})))
}

// ============================================================================
// SECTION: Endpoint Builders
// ============================================================================

/// Builds an endpoint entry for a stub URL.
pub fn stub_endpoint(endpoint: Url, tag: &str, auth: AuthConfig) -> EndpointConfig {
    EndpointConfig {
        id: "did:key:z6MkStubEndpoint".to_string(),
        endpoint,
        tags: BTreeSet::from([tag.to_string()]),
        auth,
        headers: BTreeMap::new(),
        options: None,
    }
}
