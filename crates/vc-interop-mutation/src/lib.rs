// crates/vc-interop-mutation/src/lib.rs
// ============================================================================
// Module: VC Interop Mutation
// Description: Credential fixtures and negative mutation generation.
// Purpose: Produce deterministic invalid credential variants for verifiers.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate holds the canned credential fixtures used to seed interop
//! suites, the generator that derives structurally invalid variants from
//! them, and the ordered catalog of verifier cases built on that generator.
//! Invariants:
//! - Fixtures are immutable; every variant is produced from a fresh deep copy.
//! - Candidate sets are declared once per field kind in [`FieldKind`].
//! - Variant order is deterministic for a given profile.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod fixture;
pub mod generator;
pub mod path;
pub mod profile;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::CaseCheck;
pub use catalog::SuiteCase;
pub use catalog::verifier_catalog;
pub use fixture::CredentialFixture;
pub use generator::Candidate;
pub use generator::FieldKind;
pub use generator::Mutation;
pub use generator::MutationCase;
pub use generator::MutationError;
pub use generator::MutationTarget;
pub use generator::ReplaceVariants;
pub use generator::Variant;
pub use generator::delete_field;
pub use generator::replace_field;
pub use generator::replace_field_items;
pub use path::FieldPath;
pub use profile::DataModel;
pub use profile::ValidationProfile;
