// crates/vc-interop-mutation/src/profile.rs
// ============================================================================
// Module: Validation Profiles
// Description: Data model version and assertion strictness for suites.
// Purpose: Select candidate sets and body checks per credential data model.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Verifiers built against VC Data Model v1 reject object entries in
//! `@context`; v2 allows them. Some suites also require a `verified: false`
//! body on rejections. Both knobs live in [`ValidationProfile`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Credential data model version targeted by a suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataModel {
    /// VC Data Model 1.1: `@context` items must be strings.
    #[default]
    V1,
    /// VC Data Model 2.0: `@context` items may be strings or objects.
    V2,
}

impl DataModel {
    /// Returns true when `@context` entries may be JSON objects.
    #[must_use]
    pub const fn allows_context_objects(self) -> bool {
        matches!(self, Self::V2)
    }
}

/// Validation profile applied to verifier suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationProfile {
    /// Targeted data model version.
    #[serde(default)]
    pub data_model: DataModel,
    /// Require `verified: false` in the body of 400 responses and
    /// `verified: true` in the body of the 200 for the valid credential.
    #[serde(default)]
    pub require_verified_false: bool,
}
