// system-tests/tests/helpers/audit.rs
// ============================================================================
// Module: Audit Capture
// Description: In-memory audit sink for suite assertions.
// Purpose: Let offline suites assert on emitted suite_case events.
// Dependencies: vc-interop-client
// ============================================================================

use std::sync::Mutex;

use vc_interop_client::InteropAuditSink;
use vc_interop_client::SuiteCaseEvent;
use vc_interop_client::audit::EndpointRequestEvent;

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Endpoint request events.
    pub requests: Mutex<Vec<EndpointRequestEvent>>,
    /// Suite case events.
    pub cases: Mutex<Vec<SuiteCaseEvent>>,
}

impl RecordingAuditSink {
    /// Returns a snapshot of recorded case events.
    pub fn cases(&self) -> Vec<SuiteCaseEvent> {
        self.cases.lock().map_or_else(|_| Vec::new(), |events| events.clone())
    }
}

impl InteropAuditSink for RecordingAuditSink {
    fn record_request(&self, event: &EndpointRequestEvent) {
        if let Ok(mut events) = self.requests.lock() {
            events.push(event.clone());
        }
    }

    fn record_case(&self, event: &SuiteCaseEvent) {
        if let Ok(mut events) = self.cases.lock() {
            events.push(event.clone());
        }
    }
}
