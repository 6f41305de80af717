// crates/vc-interop-mutation/src/generator.rs
// ============================================================================
// Module: Negative Mutation Generator
// Description: Deletion and invalid-type substitution on credential fixtures.
// Purpose: Derive independent, ordered invalid variants for negative cases.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Mutations never touch the fixture: each variant starts from a deep copy.
//! An absent candidate is applied as field omission so it serializes
//! differently from a literal `null`. Inside an array there is no omission,
//! so an absent item becomes `null` on the wire.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::fixture::CredentialFixture;
use crate::path::FieldPath;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building or applying mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Field path is empty or malformed.
    #[error("invalid field path: `{0}`")]
    InvalidPath(String),
    /// An intermediate path segment is absent or not an object.
    #[error("parent of field {0} is missing or not an object")]
    MissingParent(String),
    /// Fixture documents must be JSON objects.
    #[error("credential fixture must be a json object")]
    NotAnObject,
    /// Fixture text could not be parsed.
    #[error("credential fixture json error: {0}")]
    Json(String),
}

// ============================================================================
// SECTION: Candidates
// ============================================================================

/// Value substituted at a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Literal JSON value (including `null`).
    Json(Value),
    /// No value; the field is omitted from the document.
    Absent,
}

impl Candidate {
    /// Short label used in reports, e.g. `number` or `absent`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Json(Value::Null) => "null",
            Self::Json(Value::Bool(_)) => "boolean",
            Self::Json(Value::Number(_)) => "number",
            Self::Json(Value::String(_)) => "string",
            Self::Json(Value::Array(_)) => "array",
            Self::Json(Value::Object(_)) => "object",
        }
    }

    /// Value placed inside an array, where omission is not representable.
    fn into_array_item(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Absent => Value::Null,
        }
    }
}

/// Declared shape of a credential field, selecting its invalid candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Array of strings (`@context`, `type`) judged as a whole.
    StringArray,
    /// Entries of a string array (`@context`, `type`).
    StringArrayItem {
        /// Object entries are legitimate (v2 `@context`).
        objects_allowed: bool,
    },
    /// JSON object (`credentialSubject`, `proof`).
    Object,
    /// JSON object or string (`issuer`).
    ObjectOrString,
}

impl FieldKind {
    /// Returns the ordered invalid candidates for this kind.
    #[must_use]
    pub fn invalid_candidates(self) -> Vec<Candidate> {
        let candidates = match self {
            Self::StringArray => vec![
                Candidate::Json(json!("string")),
                Candidate::Json(json!({})),
                Candidate::Json(Value::Null),
                Candidate::Absent,
                Candidate::Json(json!(10)),
                Candidate::Json(json!(true)),
            ],
            Self::StringArrayItem {
                ..
            } => vec![
                Candidate::Json(json!([])),
                Candidate::Json(json!({})),
                Candidate::Json(Value::Null),
                Candidate::Absent,
                Candidate::Json(json!(10)),
                Candidate::Json(json!(true)),
            ],
            Self::Object => vec![
                Candidate::Json(json!("string")),
                Candidate::Json(Value::Null),
                Candidate::Absent,
                Candidate::Json(json!(10)),
                Candidate::Json(json!(true)),
                Candidate::Json(json!([])),
            ],
            Self::ObjectOrString => vec![
                Candidate::Json(json!([])),
                Candidate::Json(Value::Null),
                Candidate::Absent,
                Candidate::Json(json!(10)),
                Candidate::Json(json!(true)),
            ],
        };
        match self {
            Self::StringArrayItem {
                objects_allowed: true,
            } => candidates
                .into_iter()
                .filter(|candidate| !matches!(candidate, Candidate::Json(Value::Object(_))))
                .collect(),
            _ => candidates,
        }
    }
}

// ============================================================================
// SECTION: Mutation Cases
// ============================================================================

/// Operation applied at a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Remove the field.
    Delete,
    /// Substitute a value of the wrong type.
    ReplaceWithInvalidType(Candidate),
}

/// Whether a replacement lands on the field itself or on its array items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    /// Replace the field value.
    Field,
    /// Replace the field with a one-element array holding the candidate.
    Items,
}

/// One negative-test iteration: a single mutation at a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationCase {
    /// Field addressed by the mutation.
    pub path: FieldPath,
    /// Where a replacement is placed.
    pub target: MutationTarget,
    /// Mutation to apply.
    pub mutation: Mutation,
}

impl MutationCase {
    /// Builds a deletion case.
    #[must_use]
    pub const fn delete(path: FieldPath) -> Self {
        Self {
            path,
            target: MutationTarget::Field,
            mutation: Mutation::Delete,
        }
    }

    /// Builds a replacement case.
    #[must_use]
    pub const fn replace(path: FieldPath, target: MutationTarget, candidate: Candidate) -> Self {
        Self {
            path,
            target,
            mutation: Mutation::ReplaceWithInvalidType(candidate),
        }
    }

    /// Human-readable description, e.g. `delete proof.type` or
    /// `@context[] = number`.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.mutation, self.target) {
            (Mutation::Delete, _) => format!("delete {}", self.path),
            (Mutation::ReplaceWithInvalidType(candidate), MutationTarget::Field) => {
                format!("{} = {}", self.path, candidate.label())
            }
            (Mutation::ReplaceWithInvalidType(candidate), MutationTarget::Items) => {
                format!("{}[] = {}", self.path, candidate.label())
            }
        }
    }

    /// Applies the mutation to a fresh copy of the fixture.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::MissingParent`] when the path cannot be
    /// resolved in the fixture.
    pub fn apply(&self, fixture: &CredentialFixture) -> Result<Value, MutationError> {
        let mut document = fixture.to_value();
        self.apply_in_place(&mut document)?;
        Ok(document)
    }

    /// Applies the mutation to a document the caller already owns.
    fn apply_in_place(&self, document: &mut Value) -> Result<(), MutationError> {
        let parent = self.path.parent_mut(document)?;
        let key = self.path.leaf().to_string();
        match (&self.mutation, self.target) {
            (Mutation::Delete, _)
            | (Mutation::ReplaceWithInvalidType(Candidate::Absent), MutationTarget::Field) => {
                parent.remove(&key);
            }
            (Mutation::ReplaceWithInvalidType(Candidate::Json(value)), MutationTarget::Field) => {
                parent.insert(key, value.clone());
            }
            (Mutation::ReplaceWithInvalidType(candidate), MutationTarget::Items) => {
                parent.insert(key, Value::Array(vec![candidate.clone().into_array_item()]));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Returns a deep copy of the fixture with the field at `path` removed.
///
/// Removing a field that is already absent yields an unchanged copy.
///
/// # Errors
///
/// Returns [`MutationError::MissingParent`] when an intermediate segment is
/// missing.
pub fn delete_field(fixture: &CredentialFixture, path: &FieldPath) -> Result<Value, MutationError> {
    MutationCase::delete(path.clone()).apply(fixture)
}

/// Returns the restartable sequence of variants replacing the field at `path`.
///
/// # Errors
///
/// Returns [`MutationError::MissingParent`] when the path cannot be resolved.
pub fn replace_field<'a>(
    fixture: &'a CredentialFixture,
    path: &FieldPath,
    candidates: Vec<Candidate>,
) -> Result<ReplaceVariants<'a>, MutationError> {
    ReplaceVariants::new(fixture, path, MutationTarget::Field, candidates)
}

/// Returns the restartable sequence of variants replacing the field at `path`
/// with a one-element array holding each candidate.
///
/// # Errors
///
/// Returns [`MutationError::MissingParent`] when the path cannot be resolved.
pub fn replace_field_items<'a>(
    fixture: &'a CredentialFixture,
    path: &FieldPath,
    candidates: Vec<Candidate>,
) -> Result<ReplaceVariants<'a>, MutationError> {
    ReplaceVariants::new(fixture, path, MutationTarget::Items, candidates)
}

/// A single generated variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Mutation that produced the document.
    pub case: MutationCase,
    /// Mutated deep copy of the fixture.
    pub document: Value,
}

/// Lazy, finite, restartable sequence of replacement variants.
///
/// # Invariants
/// - The path resolves against the fixture (checked on construction).
/// - Each call to [`ReplaceVariants::iter`] starts over from the first
///   candidate and clones the fixture per item.
#[derive(Debug, Clone)]
pub struct ReplaceVariants<'a> {
    /// Seed fixture.
    fixture: &'a CredentialFixture,
    /// One case per candidate, in candidate order.
    cases: Vec<MutationCase>,
}

impl<'a> ReplaceVariants<'a> {
    /// Validates the path and prepares one case per candidate.
    fn new(
        fixture: &'a CredentialFixture,
        path: &FieldPath,
        target: MutationTarget,
        candidates: Vec<Candidate>,
    ) -> Result<Self, MutationError> {
        let mut probe = fixture.to_value();
        path.parent_mut(&mut probe)?;
        let cases = candidates
            .into_iter()
            .map(|candidate| MutationCase::replace(path.clone(), target, candidate))
            .collect();
        Ok(Self {
            fixture,
            cases,
        })
    }

    /// Number of variants in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when no candidates were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Iterates the variants from the beginning.
    ///
    /// Each item is built from a fresh copy of the fixture. The path was
    /// resolved in `new`, so items only fail if that resolution no longer
    /// holds.
    pub fn iter(&self) -> impl Iterator<Item = Result<Variant, MutationError>> + '_ {
        self.cases.iter().map(|case| {
            let document = case.apply(self.fixture)?;
            Ok(Variant {
                case: case.clone(),
                document,
            })
        })
    }

    /// Returns the underlying mutation cases.
    #[must_use]
    pub fn cases(&self) -> &[MutationCase] {
        &self.cases
    }
}
