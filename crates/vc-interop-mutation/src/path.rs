// crates/vc-interop-mutation/src/path.rs
// ============================================================================
// Module: Field Paths
// Description: Dotted paths addressing fields inside credential documents.
// Purpose: Locate the parent object and key targeted by a mutation.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`FieldPath`] is a dot-separated list of object keys such as `proof.type`.
//! Keys may contain `@` (for `@context`) but never dots or empty segments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde_json::Map;
use serde_json::Value;

use crate::generator::MutationError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Path to a field inside a JSON object, one key per segment.
///
/// # Invariants
/// - At least one segment.
/// - No segment is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    /// Object keys from the document root to the target field.
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dotted path such as `proof.verificationMethod`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::InvalidPath`] when the path is empty or has
    /// an empty segment.
    pub fn parse(raw: &str) -> Result<Self, MutationError> {
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(MutationError::InvalidPath(raw.to_string()));
        }
        Ok(Self {
            segments,
        })
    }

    /// Builds a path from a literal known to be well formed.
    pub(crate) fn known(raw: &'static str) -> Self {
        Self {
            segments: raw.split('.').map(str::to_string).collect(),
        }
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the final key addressed by the path.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns true when the path addresses a top-level field.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }

    /// Resolves the object that owns the leaf field.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::MissingParent`] when an intermediate segment is
    /// absent or not an object.
    pub(crate) fn parent_mut<'a>(
        &self,
        document: &'a mut Value,
    ) -> Result<&'a mut Map<String, Value>, MutationError> {
        let mut current = document;
        let parents = &self.segments[..self.segments.len().saturating_sub(1)];
        for segment in parents {
            current = current
                .get_mut(segment.as_str())
                .ok_or_else(|| MutationError::MissingParent(self.to_string()))?;
        }
        current.as_object_mut().ok_or_else(|| MutationError::MissingParent(self.to_string()))
    }

    /// Returns the value at this path, if present.
    #[must_use]
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments.iter().try_fold(document, |current, segment| current.get(segment.as_str()))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
