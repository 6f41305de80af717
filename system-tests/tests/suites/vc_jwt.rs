// system-tests/tests/suites/vc_jwt.rs
// ============================================================================
// Module: JWT Live Tests
// Description: Issue a fresh credential, then run the catalog on JWT verifiers.
// Purpose: Record one interop column per configured JWT verifier.
// Dependencies: system-tests, helpers
// ============================================================================

//! ## Overview
//! The credential under test is issued by the configured `suite.issuer_name`
//! implementation's JWT issuer with a fresh `urn:uuid` id. Every selected
//! implementation with a JWT verifier then runs the verifier catalog against
//! that credential.

use helpers::artifacts::TestReporter;
use helpers::live::LiveHarness;
use system_tests::report::SuiteColumns;
use system_tests::suite::ISSUER_SUITE;
use system_tests::suite::JWT_SUITE;
use system_tests::suite::JWT_TAG;
use system_tests::suite::SuiteContext;
use system_tests::suite::run_issuer_suite;
use system_tests::suite::run_verifier_suite;
use vc_interop_config::EndpointRole;
use vc_interop_config::TagFilter;
use vc_interop_mutation::CredentialFixture;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn jwt_verifiers() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("vc_jwt")?;
    let harness = LiveHarness::load(reporter.artifacts())?;
    let verifier_filter = TagFilter::new(EndpointRole::Verifiers, [JWT_TAG]);
    let issuer_filter = TagFilter::new(EndpointRole::Issuers, [JWT_TAG]);
    reporter
        .set_columns(SuiteColumns::from_partition(&harness.registry.filter_by_tag(&verifier_filter)));

    let issuer_name =
        harness.config.suite.issuer_name.as_deref().ok_or("suite.issuer_name is required for JWT")?;
    let issuer = harness
        .registry
        .get(issuer_name)?
        .endpoint_with_tags(EndpointRole::Issuers, &issuer_filter.tags)
        .ok_or_else(|| format!("{issuer_name} has no JWT issuer"))?;
    let issue_context = SuiteContext {
        client: &harness.client,
        implementation: issuer_name,
        suite: ISSUER_SUITE,
    };
    let run = run_issuer_suite(&issue_context, issuer, &CredentialFixture::unsigned_v1()).await?;
    let fixture = run.fixture();
    reporter.push_report(run.report);
    let Some(fixture) = fixture else {
        reporter.finish("blocked", vec![format!("{issuer_name} did not issue a credential")])?;
        return Err("credential issuance failed".into());
    };

    let profile = harness.config.suite.profile();
    let mut notes = Vec::new();
    for implementation in harness.selected(&verifier_filter) {
        let Some(verifier) =
            implementation.endpoint_with_tags(EndpointRole::Verifiers, &verifier_filter.tags)
        else {
            continue;
        };
        let context = SuiteContext {
            client: &harness.client,
            implementation: &implementation.name,
            suite: JWT_SUITE,
        };
        match run_verifier_suite(&context, verifier, &fixture, &profile).await {
            Ok(report) => reporter.push_report(report),
            Err(err) => notes.push(format!("{} aborted: {err}", implementation.name)),
        }
    }

    reporter.finish("complete", notes)?;
    Ok(())
}
