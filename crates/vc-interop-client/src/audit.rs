// crates/vc-interop-client/src/audit.rs
// ============================================================================
// Module: Interop Audit Logging
// Description: Structured audit events for outbound interop requests.
// Purpose: Emit redacted JSON-line logs without hard dependencies.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for the interop
//! harness. Events never carry secrets: auth is reported by scheme label
//! only, and token requests report attempt counts rather than credentials.
//! Sinks are lightweight so runs can route events to stderr, a file, or
//! nowhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outbound endpoint request audit event.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointRequestEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Target URL.
    pub endpoint: String,
    /// Auth scheme label.
    pub auth_scheme: &'static str,
    /// HTTP status when a response arrived.
    pub status: Option<u16>,
    /// Transport or auth error message when the request failed.
    pub error: Option<String>,
    /// Request duration in milliseconds.
    pub duration_ms: u128,
    /// Request body size in bytes.
    pub request_bytes: usize,
}

/// OAuth2 token request audit event.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequestEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// One-based attempt number.
    pub attempt: u32,
    /// Total attempts allowed.
    pub max_attempts: u32,
    /// Whether the attempt produced a token.
    pub success: bool,
    /// Failure description when unsuccessful.
    pub error: Option<String>,
}

/// Suite case result audit event.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteCaseEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Implementation name.
    pub implementation: String,
    /// Suite name.
    pub suite: String,
    /// Case title.
    pub case: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Observed statuses per variant, in order.
    pub statuses: Vec<Option<u16>>,
}

/// Parameters for constructing an endpoint request event.
pub struct EndpointRequestEventParams {
    /// Target URL.
    pub endpoint: String,
    /// Auth scheme label.
    pub auth_scheme: &'static str,
    /// HTTP status when a response arrived.
    pub status: Option<u16>,
    /// Error message when the request failed.
    pub error: Option<String>,
    /// Request duration in milliseconds.
    pub duration_ms: u128,
    /// Request body size in bytes.
    pub request_bytes: usize,
}

/// Parameters for constructing a token request event.
pub struct TokenRequestEventParams {
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// One-based attempt number.
    pub attempt: u32,
    /// Total attempts allowed.
    pub max_attempts: u32,
    /// Failure description when unsuccessful.
    pub error: Option<String>,
}

/// Parameters for constructing a suite case event.
pub struct SuiteCaseEventParams {
    /// Implementation name.
    pub implementation: String,
    /// Suite name.
    pub suite: String,
    /// Case title.
    pub case: String,
    /// Whether the case passed.
    pub passed: bool,
    /// Observed statuses per variant.
    pub statuses: Vec<Option<u16>>,
}

/// Returns the current time in milliseconds since epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

impl EndpointRequestEvent {
    /// Creates an endpoint request event.
    #[must_use]
    pub fn new(params: EndpointRequestEventParams) -> Self {
        Self {
            event: "endpoint_request",
            timestamp_ms: now_ms(),
            endpoint: params.endpoint,
            auth_scheme: params.auth_scheme,
            status: params.status,
            error: params.error,
            duration_ms: params.duration_ms,
            request_bytes: params.request_bytes,
        }
    }
}

impl TokenRequestEvent {
    /// Creates a token request event.
    #[must_use]
    pub fn new(params: TokenRequestEventParams) -> Self {
        Self {
            event: "token_request",
            timestamp_ms: now_ms(),
            token_endpoint: params.token_endpoint,
            attempt: params.attempt,
            max_attempts: params.max_attempts,
            success: params.error.is_none(),
            error: params.error,
        }
    }
}

impl SuiteCaseEvent {
    /// Creates a suite case event.
    #[must_use]
    pub fn new(params: SuiteCaseEventParams) -> Self {
        Self {
            event: "suite_case",
            timestamp_ms: now_ms(),
            implementation: params.implementation,
            suite: params.suite,
            case: params.case,
            passed: params.passed,
            statuses: params.statuses,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for interop events.
pub trait InteropAuditSink: Send + Sync {
    /// Record an endpoint request event.
    fn record_request(&self, event: &EndpointRequestEvent);

    /// Record a token request event.
    fn record_token(&self, _event: &TokenRequestEvent) {}

    /// Record a suite case event.
    fn record_case(&self, _event: &SuiteCaseEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one serialized event line to stderr.
    fn emit<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

impl InteropAuditSink for StderrAuditSink {
    fn record_request(&self, event: &EndpointRequestEvent) {
        Self::emit(event);
    }

    fn record_token(&self, event: &TokenRequestEvent) {
        Self::emit(event);
    }

    fn record_case(&self, event: &SuiteCaseEvent) {
        Self::emit(event);
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event line.
    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl InteropAuditSink for FileAuditSink {
    fn record_request(&self, event: &EndpointRequestEvent) {
        self.emit(event);
    }

    fn record_token(&self, event: &TokenRequestEvent) {
        self.emit(event);
    }

    fn record_case(&self, event: &SuiteCaseEvent) {
        self.emit(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl InteropAuditSink for NoopAuditSink {
    fn record_request(&self, _event: &EndpointRequestEvent) {}
}
