// system-tests/tests/helpers/live.rs
// ============================================================================
// Module: Live Harness
// Description: Config loading and client setup for live interop suites.
// Purpose: Share registry selection and audit wiring across live suites.
// Dependencies: system-tests, vc-interop-client, vc-interop-config
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use system_tests::config::SystemTestConfig;
use vc_interop_client::FileAuditSink;
use vc_interop_client::InteropClient;
use vc_interop_config::ImplementationDescriptor;
use vc_interop_config::ImplementationRegistry;
use vc_interop_config::InteropConfig;
use vc_interop_config::TagFilter;

use super::artifacts::TestArtifacts;

/// Loaded configuration and client for a live run.
pub struct LiveHarness {
    /// Environment overrides.
    pub env: SystemTestConfig,
    /// Harness configuration.
    pub config: InteropConfig,
    /// Implementation registry.
    pub registry: ImplementationRegistry,
    /// Authorized client writing audit events under the artifact root.
    pub client: InteropClient,
}

impl LiveHarness {
    /// Loads the harness config and builds a client auditing to `audit.jsonl`.
    pub fn load(artifacts: &TestArtifacts) -> Result<Self, String> {
        let env = SystemTestConfig::load()?;
        let mut config =
            InteropConfig::load(env.config_path.as_deref()).map_err(|err| err.to_string())?;
        if let Some(timeout) = env.timeout {
            config.client.timeout_ms = duration_ms(timeout);
        }
        let registry = config.registry().map_err(|err| err.to_string())?;
        let audit = FileAuditSink::new(&artifacts.root().join("audit.jsonl"))
            .map_err(|err| format!("failed to open audit log: {err}"))?;
        let client = InteropClient::new(&config.client)
            .map_err(|err| err.to_string())?
            .with_audit(Arc::new(audit));
        Ok(Self {
            env,
            config,
            registry,
            client,
        })
    }

    /// Returns selected implementations matching `filter`, by name.
    pub fn selected<'a>(&'a self, filter: &TagFilter) -> Vec<&'a ImplementationDescriptor> {
        self.registry
            .filter_by_tag(filter)
            .matched
            .into_values()
            .filter(|descriptor| self.env.selects(&descriptor.name))
            .collect()
    }
}

/// Converts a duration to whole milliseconds, saturating.
fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
