// crates/vc-interop-client/src/outcome.rs
// ============================================================================
// Module: Request Outcomes
// Description: Value types for accepted and rejected service responses.
// Purpose: Surface expected HTTP errors as values rather than failures.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Negative interop cases expect services to answer with 4xx statuses, so a
//! non-2xx response is a normal [`RequestOutcome::Rejected`] value carrying
//! an [`HttpError`]. Only transport, auth, and configuration failures are
//! errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A 2xx response from a service under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body; non-JSON bodies become a JSON string, empty bodies null.
    pub body: Value,
}

/// A non-2xx response from a service under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Response body; non-JSON bodies become a JSON string, empty bodies null.
    pub body: Value,
}

impl HttpError {
    /// Returns the `verified` flag of a verifier rejection body, if present.
    #[must_use]
    pub fn verified(&self) -> Option<bool> {
        self.body.get("verified").and_then(Value::as_bool)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http status {}: {}", self.status, self.body)
    }
}

/// Result of one outbound request that reached the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// 2xx response.
    Accepted(ServiceResponse),
    /// Non-2xx response.
    Rejected(HttpError),
}

impl RequestOutcome {
    /// Classifies a status and raw body.
    #[must_use]
    pub fn from_parts(status: u16, body: &[u8]) -> Self {
        let body = parse_body(body);
        if (200..300).contains(&status) {
            Self::Accepted(ServiceResponse {
                status,
                body,
            })
        } else {
            Self::Rejected(HttpError {
                status,
                body,
            })
        }
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Accepted(response) => response.status,
            Self::Rejected(error) => error.status,
        }
    }

    /// Returns the response body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        match self {
            Self::Accepted(response) => &response.body,
            Self::Rejected(error) => &error.body,
        }
    }

    /// Returns true for 2xx responses.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Converts into a `Result` for callers that treat rejection as failure.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] for non-2xx responses.
    pub fn into_result(self) -> Result<ServiceResponse, HttpError> {
        match self {
            Self::Accepted(response) => Ok(response),
            Self::Rejected(error) => Err(error),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a response body as JSON, falling back to a lossy string.
#[must_use]
pub fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
