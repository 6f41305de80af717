// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for VC interop system-tests.
// Purpose: Provide stub services, audit capture, artifacts, and live setup.
// Dependencies: system-tests, vc-interop-client, vc-interop-config, tiny_http
// ============================================================================

//! ## Overview
//! Shared helpers for VC interop system-tests.
//! Invariants:
//! - Offline suites never leave the loopback interface.
//! - Remote responses are treated as untrusted input.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod audit;
pub mod live;
pub mod stubs;
