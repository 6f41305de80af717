// crates/vc-interop-client/src/lib.rs
// ============================================================================
// Module: VC Interop Client Library
// Description: Authorized request builder for VC issuer and verifier APIs.
// Purpose: Send authenticated JSON POSTs and classify service responses.
// Dependencies: reqwest, ed25519-dalek, vc-interop-config
// ============================================================================

//! ## Overview
//! `vc-interop-client` builds one authenticated HTTP POST per call against
//! an issuer or verifier endpoint. Four schemes are supported: zcap
//! capability invocation signatures, OAuth2 client-credentials bearer
//! tokens, static bearer tokens, and no auth. Expected HTTP failures are
//! values ([`RequestOutcome::Rejected`]); configuration, auth, and transport
//! failures are [`ClientError`]s.
//!
//! Security posture: TLS certificate verification is disabled. This crate is
//! an interoperability test tool and is unsafe for production traffic.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod client;
pub mod oauth2;
pub mod outcome;
pub mod zcap;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::InteropAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::SuiteCaseEvent;
pub use audit::SuiteCaseEventParams;
pub use client::ClientError;
pub use client::InteropClient;
pub use client::issuance_body;
pub use client::verification_body;
pub use outcome::HttpError;
pub use outcome::RequestOutcome;
pub use outcome::ServiceResponse;
pub use zcap::InvocationSigner;

#[cfg(test)]
mod tests;
