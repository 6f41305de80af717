// system-tests/src/suite.rs
// ============================================================================
// Module: Suite Runner
// Description: Sequential verifier and issuer suites over the case catalog.
// Purpose: Turn catalog cases into requests and classify each response.
// Dependencies: vc-interop-client, vc-interop-config, vc-interop-mutation, uuid
// ============================================================================

//! ## Overview
//! Suites send one request at a time. A negative case passes only when every
//! variant is answered with HTTP 400 (and `verified: false` when the profile
//! requires it); the positive case passes on HTTP 200 unless the body reports
//! `verified: false` (the strict profile also requires `verified: true`).
//!
//! Error policy: transport failures and oversized responses are recorded on
//! the variant and fail the case. Configuration and auth failures abort the
//! suite for that implementation and are returned as `Err`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use uuid::Uuid;
use vc_interop_client::ClientError;
use vc_interop_client::InteropClient;
use vc_interop_client::SuiteCaseEvent;
use vc_interop_client::SuiteCaseEventParams;
use vc_interop_config::EndpointConfig;
use vc_interop_mutation::CaseCheck;
use vc_interop_mutation::CredentialFixture;
use vc_interop_mutation::MutationError;
use vc_interop_mutation::SuiteCase;
use vc_interop_mutation::ValidationProfile;
use vc_interop_mutation::verifier_catalog;

use crate::report::CaseReport;
use crate::report::SuiteReport;
use crate::report::VariantReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suite title for Data Integrity verifiers.
pub const DATA_INTEGRITY_SUITE: &str = "Verify Credential - Data Integrity";
/// Suite title for JWT verifiers.
pub const JWT_SUITE: &str = "Verify Credential - JWT";
/// Suite title for issuance checks.
pub const ISSUER_SUITE: &str = "Issue Credential";
/// Endpoint tag selecting Data Integrity verifiers.
pub const DATA_INTEGRITY_TAG: &str = "VC-HTTP-API";
/// Endpoint tag selecting JWT issuers and verifiers.
pub const JWT_TAG: &str = "JWT";
/// Title of the issuance case.
pub const ISSUE_CASE: &str = "MUST issue a valid VC.";
/// Variant description for the unmodified credential.
const VALID_VARIANT: &str = "valid";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Shared inputs for one suite run.
#[derive(Clone, Copy)]
pub struct SuiteContext<'a> {
    /// Authorized client; its audit sink receives `suite_case` events.
    pub client: &'a InteropClient,
    /// Implementation name (matrix column).
    pub implementation: &'a str,
    /// Suite title.
    pub suite: &'a str,
}

/// Result of an issuer suite run.
#[derive(Debug, Clone)]
pub struct IssuerRun {
    /// Issuance case report.
    pub report: SuiteReport,
    /// Issued credential when the issuer returned one with a proof.
    pub credential: Option<Value>,
}

impl IssuerRun {
    /// Returns the issued credential as a fixture for verifier suites.
    #[must_use]
    pub fn fixture(&self) -> Option<CredentialFixture> {
        self.credential.clone().and_then(|credential| CredentialFixture::new(credential).ok())
    }
}

// ============================================================================
// SECTION: Verifier Suite
// ============================================================================

/// Runs every catalog case for `profile` against one verifier.
///
/// # Errors
///
/// Returns [`ClientError`] when configuration or auth fails; transport
/// failures are recorded in the report instead.
pub async fn run_verifier_suite(
    context: &SuiteContext<'_>,
    verifier: &EndpointConfig,
    fixture: &CredentialFixture,
    profile: &ValidationProfile,
) -> Result<SuiteReport, ClientError> {
    let mut report = SuiteReport::new(context.implementation, context.suite);
    for case in verifier_catalog(profile) {
        let row = run_case(context.client, verifier, fixture, profile, &case).await?;
        record_case(context, &row);
        report.cases.push(row);
    }
    Ok(report)
}

/// Sends every variant of one case and classifies the responses.
async fn run_case(
    client: &InteropClient,
    verifier: &EndpointConfig,
    fixture: &CredentialFixture,
    profile: &ValidationProfile,
    case: &SuiteCase,
) -> Result<CaseReport, ClientError> {
    let (variants, passed) = match &case.check {
        CaseCheck::AcceptsValid => {
            let variant =
                observe(client, verifier, Ok(fixture.to_value()), VALID_VARIANT.to_string()).await?;
            let passed = is_acceptance(&variant, profile);
            (vec![variant], passed)
        }
        CaseCheck::RejectsAll(mutations) => {
            let mut variants = Vec::with_capacity(mutations.len());
            for mutation in mutations {
                let document = mutation.apply(fixture);
                variants.push(observe(client, verifier, document, mutation.describe()).await?);
            }
            let passed =
                !variants.is_empty() && variants.iter().all(|variant| is_rejection(variant, profile));
            (variants, passed)
        }
    };
    Ok(CaseReport {
        title: case.title.clone(),
        passed,
        variants,
    })
}

/// Sends one credential to the verifier and records what came back.
async fn observe(
    client: &InteropClient,
    verifier: &EndpointConfig,
    document: Result<Value, MutationError>,
    description: String,
) -> Result<VariantReport, ClientError> {
    let credential = match document {
        Ok(credential) => credential,
        Err(err) => return Ok(failed_variant(description, err.to_string())),
    };
    match client.verify(verifier, &credential).await {
        Ok(outcome) => Ok(VariantReport {
            description,
            status: Some(outcome.status()),
            verified: outcome.body().get("verified").and_then(Value::as_bool),
            error: None,
        }),
        Err(err) => recorded_failure(err).map(|message| failed_variant(description, message)),
    }
}

/// Returns true when the valid credential was accepted and verified.
///
/// A 200 whose body reports `verified: false` never passes; the strict
/// profile also requires `verified: true`.
fn is_acceptance(variant: &VariantReport, profile: &ValidationProfile) -> bool {
    variant.status == Some(200)
        && variant.verified != Some(false)
        && (!profile.require_verified_false || variant.verified == Some(true))
}

/// Returns true when a variant was rejected the way the profile requires.
fn is_rejection(variant: &VariantReport, profile: &ValidationProfile) -> bool {
    variant.status == Some(400)
        && (!profile.require_verified_false || variant.verified == Some(false))
}

// ============================================================================
// SECTION: Issuer Suite
// ============================================================================

/// Builds a credential to issue: the template with a fresh `urn:uuid` id and
/// the issuer endpoint id as `issuer`.
#[must_use]
pub fn fresh_credential(template: &CredentialFixture, issuer_id: &str) -> Value {
    let mut credential = template.to_value();
    if let Some(object) = credential.as_object_mut() {
        object.insert("id".to_string(), Value::String(format!("urn:uuid:{}", Uuid::new_v4())));
        object.insert("issuer".to_string(), Value::String(issuer_id.to_string()));
    }
    credential
}

/// Extracts the issued credential from an issuer response body.
///
/// Accepts `{ "verifiableCredential": {...} }` or a bare credential. The
/// credential must carry a `proof`.
#[must_use]
pub fn issued_credential(body: &Value) -> Option<&Value> {
    let credential = body.get("verifiableCredential").filter(|value| value.is_object()).unwrap_or(body);
    credential
        .get("proof")
        .filter(|proof| proof.is_object() || proof.is_array())
        .map(|_| credential)
}

/// Issues a fresh credential from `template` and checks the response.
///
/// # Errors
///
/// Returns [`ClientError`] when configuration or auth fails; transport
/// failures are recorded in the report instead.
pub async fn run_issuer_suite(
    context: &SuiteContext<'_>,
    issuer: &EndpointConfig,
    template: &CredentialFixture,
) -> Result<IssuerRun, ClientError> {
    let credential = fresh_credential(template, &issuer.id);
    let description = VALID_VARIANT.to_string();
    let (variant, issued) = match context.client.issue(issuer, &credential, None).await {
        Ok(outcome) => {
            let status = outcome.status();
            let issued = if matches!(status, 200 | 201) {
                issued_credential(outcome.body()).cloned()
            } else {
                None
            };
            let variant = VariantReport {
                description,
                status: Some(status),
                verified: None,
                error: None,
            };
            (variant, issued)
        }
        Err(err) => (failed_variant(description, recorded_failure(err)?), None),
    };
    let row = CaseReport {
        title: ISSUE_CASE.to_string(),
        passed: issued.is_some(),
        variants: vec![variant],
    };
    record_case(context, &row);
    let mut report = SuiteReport::new(context.implementation, context.suite);
    report.cases.push(row);
    Ok(IssuerRun {
        report,
        credential: issued,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits client errors into recorded failures and suite-aborting errors.
fn recorded_failure(err: ClientError) -> Result<String, ClientError> {
    match err {
        ClientError::Network(_) | ClientError::ResponseTooLarge { .. } => Ok(err.to_string()),
        ClientError::Config(_) | ClientError::Auth(_) | ClientError::Json(_) => Err(err),
    }
}

/// Builds a variant with no response.
const fn failed_variant(description: String, error: String) -> VariantReport {
    VariantReport {
        description,
        status: None,
        verified: None,
        error: Some(error),
    }
}

/// Emits a `suite_case` audit event for a finished case.
fn record_case(context: &SuiteContext<'_>, row: &CaseReport) {
    context.client.audit().record_case(&SuiteCaseEvent::new(SuiteCaseEventParams {
        implementation: context.implementation.to_string(),
        suite: context.suite.to_string(),
        case: row.title.clone(),
        passed: row.passed,
        statuses: row.statuses(),
    }));
}
