// system-tests/src/lib.rs
// ============================================================================
// Module: VC Interop System Tests Library
// Description: Suite runner, report records, and environment configuration.
// Purpose: Drive verifier and issuer suites against registered implementations.
// Dependencies: vc-interop-client, vc-interop-config, vc-interop-mutation
// ============================================================================

//! ## Overview
//! This crate hosts the suite runner used by the offline and live suites in
//! `system-tests/tests`. A suite run walks the verifier case catalog against
//! one endpoint, one request at a time, and returns a [`report::SuiteReport`]
//! holding one row per case.
//! Security posture: remote responses are untrusted and are recorded, never
//! interpreted beyond status and the `verified` flag.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod report;
pub mod suite;
