// crates/vc-interop-client/src/tests/mod.rs
// ============================================================================
// Module: Client Unit Tests
// Description: Unit test modules for vc-interop-client.
// Purpose: Group signing, outcome, and audit tests.
// Dependencies: vc-interop-client
// ============================================================================

//! ## Overview
//! Unit tests for zcap signing, response classification, and audit sinks.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
