// crates/vc-interop-mutation/src/catalog.rs
// ============================================================================
// Module: Verifier Case Catalog
// Description: Ordered, named verifier cases shared by all suites.
// Purpose: Declare the positive case and every negative case in one table.
// Dependencies: crate::generator
// ============================================================================

//! ## Overview
//! The catalog lists the verifier cases in the order they appear in interop
//! reports: the positive case, the required-field deletions, then the
//! invalid-type sweeps. Titles are stable report row identifiers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::generator::FieldKind;
use crate::generator::MutationCase;
use crate::generator::MutationTarget;
use crate::path::FieldPath;
use crate::profile::ValidationProfile;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Required fields whose absence must be rejected, in report order.
const REQUIRED_FIELDS: [&str; 10] = [
    "@context",
    "type",
    "issuer",
    "credentialSubject",
    "proof",
    "proof.type",
    "proof.created",
    "proof.verificationMethod",
    "proof.proofValue",
    "proof.proofPurpose",
];

// ============================================================================
// SECTION: Types
// ============================================================================

/// Expected verifier behaviour for a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseCheck {
    /// The unmodified fixture must verify (HTTP 200).
    AcceptsValid,
    /// Every mutation must be rejected (HTTP 400).
    RejectsAll(Vec<MutationCase>),
}

/// A named verifier case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteCase {
    /// Report row title.
    pub title: String,
    /// Expected behaviour.
    pub check: CaseCheck,
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Returns the verifier cases for a profile, in report order.
#[must_use]
pub fn verifier_catalog(profile: &ValidationProfile) -> Vec<SuiteCase> {
    let mut cases = vec![SuiteCase {
        title: "MUST verify a valid VC.".to_string(),
        check: CaseCheck::AcceptsValid,
    }];
    for field in REQUIRED_FIELDS {
        cases.push(SuiteCase {
            title: format!("MUST not verify if \"{field}\" property is missing."),
            check: CaseCheck::RejectsAll(vec![MutationCase::delete(FieldPath::known(field))]),
        });
    }
    let objects_allowed = profile.data_model.allows_context_objects();
    let context_items_title = if objects_allowed {
        "MUST not verify if \"@context\" items are not strings or objects."
    } else {
        "MUST not verify if \"@context\" items are not strings."
    };
    let sweeps = [
        (
            "MUST not verify if \"@context\" is not an array.",
            "@context",
            MutationTarget::Field,
            FieldKind::StringArray,
        ),
        (
            context_items_title,
            "@context",
            MutationTarget::Items,
            FieldKind::StringArrayItem {
                objects_allowed,
            },
        ),
        (
            "MUST not verify if \"type\" is not an array.",
            "type",
            MutationTarget::Field,
            FieldKind::StringArray,
        ),
        (
            "MUST not verify if \"type\" items are not strings.",
            "type",
            MutationTarget::Items,
            FieldKind::StringArrayItem {
                objects_allowed: false,
            },
        ),
        (
            "MUST not verify if \"issuer\" is not an object or a string.",
            "issuer",
            MutationTarget::Field,
            FieldKind::ObjectOrString,
        ),
        (
            "MUST not verify if \"credentialSubject\" is not an object.",
            "credentialSubject",
            MutationTarget::Field,
            FieldKind::Object,
        ),
        (
            "MUST not verify if \"proof\" is not an object.",
            "proof",
            MutationTarget::Field,
            FieldKind::Object,
        ),
    ];
    for (title, field, target, kind) in sweeps {
        let mutations = kind
            .invalid_candidates()
            .into_iter()
            .map(|candidate| MutationCase::replace(FieldPath::known(field), target, candidate))
            .collect();
        cases.push(SuiteCase {
            title: title.to_string(),
            check: CaseCheck::RejectsAll(mutations),
        });
    }
    cases
}
