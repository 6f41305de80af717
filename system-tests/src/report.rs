// system-tests/src/report.rs
// ============================================================================
// Module: Suite Reports
// Description: Serializable per-case results and interop matrix columns.
// Purpose: Record the row and column data of an interop run.
// Dependencies: serde, vc-interop-config
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] is one column of the interop matrix: every case row for
//! one implementation under one suite. [`SuiteColumns`] lists which
//! implementations were run and which were skipped for lacking the suite's
//! tags. Rendering the matrix is left to report tooling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use vc_interop_config::TagPartition;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Observed result of one request within a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantReport {
    /// Mutation description, or `valid` for the unmodified credential.
    pub description: String,
    /// HTTP status when a response was received.
    pub status: Option<u16>,
    /// `verified` flag from the response body, when present.
    pub verified: Option<bool>,
    /// Transport or mutation failure message.
    pub error: Option<String>,
}

/// Result of one named case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case title (matrix row).
    pub title: String,
    /// Whether every variant met the expectation.
    pub passed: bool,
    /// Per-variant observations, in send order.
    pub variants: Vec<VariantReport>,
}

impl CaseReport {
    /// Returns the observed status per variant.
    #[must_use]
    pub fn statuses(&self) -> Vec<Option<u16>> {
        self.variants.iter().map(|variant| variant.status).collect()
    }
}

/// Results of one suite against one implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Implementation name (matrix column).
    pub implementation: String,
    /// Suite title.
    pub suite: String,
    /// Case rows in catalog order.
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(implementation: impl Into<String>, suite: impl Into<String>) -> Self {
        Self {
            implementation: implementation.into(),
            suite: suite.into(),
            cases: Vec::new(),
        }
    }

    /// Returns true when every case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.cases.iter().all(|case| case.passed)
    }

    /// Returns the number of passing cases.
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.cases.iter().filter(|case| case.passed).count()
    }

    /// Returns the failing cases.
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| !case.passed)
    }

    /// Returns a case by title.
    #[must_use]
    pub fn case(&self, title: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.title == title)
    }
}

// ============================================================================
// SECTION: Matrix Columns
// ============================================================================

/// Implemented and not-implemented columns for a suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteColumns {
    /// Implementations with an endpoint carrying the suite's tags.
    pub implemented: Vec<String>,
    /// Implementations without such an endpoint.
    pub not_implemented: Vec<String>,
}

impl SuiteColumns {
    /// Builds columns from a registry tag partition.
    #[must_use]
    pub fn from_partition(partition: &TagPartition<'_>) -> Self {
        Self {
            implemented: partition.matched.keys().map(|name| (*name).to_string()).collect(),
            not_implemented: partition.non_matched.keys().map(|name| (*name).to_string()).collect(),
        }
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Renders a plain Markdown summary of suite reports.
#[must_use]
pub fn summary_markdown(reports: &[SuiteReport], columns: &SuiteColumns) -> String {
    let mut out = String::from("# Interop Summary\n");
    for report in reports {
        out.push_str(&format!(
            "\n## {} / {}\n\n- Passed: {}/{}\n",
            report.suite,
            report.implementation,
            report.pass_count(),
            report.cases.len()
        ));
        for case in report.failures() {
            out.push_str(&format!("- FAILED: {}\n", case.title));
        }
    }
    out.push_str("\n## Not Implemented\n\n");
    if columns.not_implemented.is_empty() {
        out.push_str("- None\n");
    }
    for name in &columns.not_implemented {
        out.push_str(&format!("- {name}\n"));
    }
    out
}
