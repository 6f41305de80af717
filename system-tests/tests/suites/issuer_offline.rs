// system-tests/tests/suites/issuer_offline.rs
// ============================================================================
// Module: Issuer Suite Offline Tests
// Description: Runs the issuer suite and the issue-then-verify flow offline.
// Purpose: Validate issuance checks, OAuth2 issuers, and JWT suite wiring.
// Dependencies: system-tests, helpers
// ============================================================================

//! ## Overview
//! Issues credentials from a stub issuer, then feeds the issued credential
//! through the verifier catalog the way the JWT suite does.

use std::sync::Arc;

use helpers::artifacts::TestReporter;
use helpers::audit::RecordingAuditSink;
use helpers::stubs::StubService;
use helpers::stubs::conforming_verifier;
use helpers::stubs::signing_issuer;
use helpers::stubs::stub_endpoint;
use helpers::stubs::token_endpoint;
use serde_json::json;
use system_tests::suite::ISSUE_CASE;
use system_tests::suite::ISSUER_SUITE;
use system_tests::suite::JWT_SUITE;
use system_tests::suite::JWT_TAG;
use system_tests::suite::SuiteContext;
use system_tests::suite::run_issuer_suite;
use system_tests::suite::run_verifier_suite;
use vc_interop_client::InteropClient;
use vc_interop_config::AuthConfig;
use vc_interop_config::ClientSettings;
use vc_interop_config::StaticSecretSource;
use vc_interop_mutation::CredentialFixture;
use vc_interop_mutation::ValidationProfile;

use crate::helpers;

/// Builds a client with a short timeout, in-memory secrets, and audit capture.
fn client(audit: Arc<RecordingAuditSink>) -> Result<InteropClient, Box<dyn std::error::Error>> {
    let settings = ClientSettings {
        timeout_ms: 5_000,
        ..ClientSettings::default()
    };
    let secrets = StaticSecretSource::new().with("VC_INTEROP_STUB_CLIENT_SECRET", "stub-secret");
    Ok(InteropClient::new(&settings)?.with_secrets(Arc::new(secrets)).with_audit(audit))
}

#[tokio::test(flavor = "multi_thread")]
async fn issuer_returns_credential_with_proof() -> Result<(), Box<dyn std::error::Error>> {
    let stub = signing_issuer(None)?;
    let audit = Arc::new(RecordingAuditSink::default());
    let client = client(Arc::clone(&audit))?;
    let issuer = stub_endpoint(stub.url("/credentials/issue"), JWT_TAG, AuthConfig::None);
    let context = SuiteContext {
        client: &client,
        implementation: "Stub Issuer",
        suite: ISSUER_SUITE,
    };

    let run = run_issuer_suite(&context, &issuer, &CredentialFixture::unsigned_v1()).await?;
    if !run.report.passed() || run.report.case(ISSUE_CASE).is_none() {
        return Err("issuance case should pass".into());
    }
    let credential = run.credential.as_ref().ok_or("issued credential missing")?;
    if credential.get("proof").is_none() {
        return Err("issued credential must carry a proof".into());
    }

    let sent = stub.requests().first().map(|request| request.json()).ok_or("no issue request")?;
    if sent["credential"]["issuer"] != json!(issuer.id) {
        return Err("issue request must name the issuer endpoint id".into());
    }
    let id = sent["credential"]["id"].as_str().unwrap_or_default();
    if !id.starts_with("urn:uuid:") {
        return Err("issue request must carry a fresh urn:uuid id".into());
    }
    if sent["options"] != json!({}) {
        return Err("issue request options default to an empty object".into());
    }
    if audit.cases().len() != 1 {
        return Err("issuer suite emits one suite_case event".into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_issuer_is_reported_not_raised() -> Result<(), Box<dyn std::error::Error>> {
    let stub = StubService::spawn(|_, _| (500, json!({"error": "boom"})))?;
    let client = client(Arc::new(RecordingAuditSink::default()))?;
    let issuer = stub_endpoint(stub.url("/issue"), JWT_TAG, AuthConfig::None);
    let context = SuiteContext {
        client: &client,
        implementation: "Broken Issuer",
        suite: ISSUER_SUITE,
    };

    let run = run_issuer_suite(&context, &issuer, &CredentialFixture::unsigned_v1()).await?;
    if run.report.passed() || run.credential.is_some() || run.fixture().is_some() {
        return Err("a 500 from the issuer must fail the issuance case".into());
    }
    let statuses = run.report.case(ISSUE_CASE).map(|case| case.statuses()).unwrap_or_default();
    if statuses != vec![Some(500)] {
        return Err("observed status must be recorded".into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn oauth2_issuer_receives_exchanged_token() -> Result<(), Box<dyn std::error::Error>> {
    let tokens = token_endpoint("stub-access-token")?;
    let stub = signing_issuer(Some("stub-access-token"))?;
    let client = client(Arc::new(RecordingAuditSink::default()))?;
    let auth = AuthConfig::Oauth2 {
        client_id: "interop".to_string(),
        client_secret_env_var: "VC_INTEROP_STUB_CLIENT_SECRET".to_string(),
        token_endpoint: tokens.url("/oauth/token"),
        audience: None,
    };
    let issuer = stub_endpoint(stub.url("/credentials/issue"), JWT_TAG, auth);
    let context = SuiteContext {
        client: &client,
        implementation: "OAuth Issuer",
        suite: ISSUER_SUITE,
    };

    let run = run_issuer_suite(&context, &issuer, &CredentialFixture::unsigned_v1()).await?;
    if !run.report.passed() {
        return Err("issuer behind oauth2 should issue with the exchanged token".into());
    }
    if tokens.requests().len() != 1 {
        return Err("one token exchange per request".into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn issued_credential_feeds_jwt_verifier_suite() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("issued_credential_feeds_jwt_verifier_suite")?;
    let issuer_stub = signing_issuer(None)?;
    let verifier_stub = conforming_verifier(false)?;
    let client = client(Arc::new(RecordingAuditSink::default()))?;
    let issuer = stub_endpoint(issuer_stub.url("/credentials/issue"), JWT_TAG, AuthConfig::None);
    let verifier = stub_endpoint(verifier_stub.url("/credentials/verify"), JWT_TAG, AuthConfig::None);

    let issue_context = SuiteContext {
        client: &client,
        implementation: "Stub",
        suite: ISSUER_SUITE,
    };
    let run = run_issuer_suite(&issue_context, &issuer, &CredentialFixture::unsigned_v1()).await?;
    let fixture = run.fixture().ok_or("issuer did not return a usable credential")?;

    let verify_context = SuiteContext {
        client: &client,
        implementation: "Stub",
        suite: JWT_SUITE,
    };
    let report =
        run_verifier_suite(&verify_context, &verifier, &fixture, &ValidationProfile::default()).await?;
    if !report.passed() {
        let failures: Vec<&str> = report.failures().map(|case| case.title.as_str()).collect();
        return Err(format!("issued credential flow failed: {}", failures.join(", ")).into());
    }

    reporter.push_report(run.report);
    reporter.push_report(report);
    reporter.finish("pass", Vec::new())?;
    Ok(())
}
