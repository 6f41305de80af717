// crates/vc-interop-mutation/src/fixture.rs
// ============================================================================
// Module: Credential Fixtures
// Description: Immutable seed credentials for positive and negative cases.
// Purpose: Hand out deep copies so cases never share mutable state.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A [`CredentialFixture`] wraps a known-valid credential document. The
//! wrapped value is never exposed mutably; callers receive clones.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use crate::generator::MutationError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Immutable credential document used as the seed for suite cases.
///
/// # Invariants
/// - The document is a JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialFixture {
    /// Seed credential document.
    document: Value,
}

impl CredentialFixture {
    /// Wraps a credential document.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotAnObject`] when the document is not a JSON
    /// object.
    pub fn new(document: Value) -> Result<Self, MutationError> {
        if !document.is_object() {
            return Err(MutationError::NotAnObject);
        }
        Ok(Self {
            document,
        })
    }

    /// Parses a credential document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] when the text is not a JSON object.
    pub fn from_json_str(text: &str) -> Result<Self, MutationError> {
        let document: Value =
            serde_json::from_str(text).map_err(|err| MutationError::Json(err.to_string()))?;
        Self::new(document)
    }

    /// Returns a read-only view of the seed document.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.document
    }

    /// Returns a deep copy of the seed document.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.document.clone()
    }

    /// Unsigned v1 credential template used to request issuance.
    #[must_use]
    pub fn unsigned_v1() -> Self {
        Self {
            document: json!({
                "@context": [
                    "https://www.w3.org/2018/credentials/v1",
                    "https://w3id.org/security/suites/ed25519-2020/v1"
                ],
                "type": ["VerifiableCredential"],
                "credentialSubject": {
                    "id": "did:key:z6MkhTNL7i2etLerDK8Acz5t528giE5KA4p75T6ka1E1D74r"
                }
            }),
        }
    }

    /// Signed v2 alumni credential with an `Ed25519Signature2020` proof.
    #[must_use]
    pub fn ed25519_v2() -> Self {
        Self {
            document: json!({
                "@context": [
                    "https://www.w3.org/ns/credentials/v2",
                    "https://www.w3.org/ns/credentials/examples/v2",
                    "https://w3id.org/security/suites/ed25519-2020/v1"
                ],
                "id": "urn:uuid:58172aac-d8ba-11ed-83dd-0b3aef56cc33",
                "type": ["VerifiableCredential", "AlumniCredential"],
                "name": "Alumni Credential",
                "description": "A minimum viable example of an Alumni Credential.",
                "issuer": "https://vc.example/issuers/5678",
                "validFrom": "2023-01-01T00:00:00Z",
                "credentialSubject": {
                    "id": "did:example:abcdefgh",
                    "alumniOf": "The School of Examples"
                },
                "proof": {
                    "type": "Ed25519Signature2020",
                    "created": "2023-02-24T23:36:38Z",
                    "verificationMethod": "did:key:z6MkrJVnaZkeFzdQyMZu1cgjg7k1pZZ6pvBQ7XJPt4swbTQ2#z6MkrJVnaZkeFzdQyMZu1cgjg7k1pZZ6pvBQ7XJPt4swbTQ2",
                    "proofPurpose": "assertionMethod",
                    "proofValue": "z57Mm1vboMtZiCyJ4aReZsv8co4Re64Y8GEjL1ZARzMbXZgkARFLqFs1P345NpPGG2hgCrS4nNdvJhpwnrNyG3kEF"
                }
            }),
        }
    }
}
