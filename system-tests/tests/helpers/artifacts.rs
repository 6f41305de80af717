// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Artifact helpers for system-tests.
// Purpose: Create per-test run roots and write suite reports and summaries.
// Dependencies: system-tests, serde, serde_json
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use system_tests::config::SystemTestConfig;
use system_tests::report::SuiteColumns;
use system_tests::report::SuiteReport;
use system_tests::report::summary_markdown;

/// Serialized `summary.json` contents.
#[derive(Debug, Serialize)]
struct TestSummary<'a> {
    /// Test name.
    test_name: String,
    /// Final status label.
    status: String,
    /// Start time in epoch milliseconds.
    started_at_ms: u128,
    /// End time in epoch milliseconds.
    ended_at_ms: u128,
    /// Elapsed milliseconds.
    duration_ms: u128,
    /// Matrix columns.
    columns: &'a SuiteColumns,
    /// Suite reports.
    reports: &'a [SuiteReport],
    /// Free-form notes.
    notes: Vec<String>,
}

/// Returns the current time in epoch milliseconds.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Returns the default artifact directory for a test.
fn default_run_root(test_name: &str) -> PathBuf {
    let stamp = now_millis();
    PathBuf::from("target/system-tests").join(format!("run_{stamp}")).join(test_name)
}

/// Artifact manager for a single system-test.
#[derive(Debug, Clone)]
pub struct TestArtifacts {
    /// Artifact directory.
    root: PathBuf,
}

impl TestArtifacts {
    /// Creates the artifact root for a test.
    pub fn new(test_name: &str) -> io::Result<Self> {
        let config = SystemTestConfig::load().map_err(io::Error::other)?;
        let root = config.run_root.map_or_else(|| default_run_root(test_name), |root| root.join(test_name));
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Returns the root directory for the test artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a pretty-printed JSON artifact.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes a text artifact with UTF-8 encoding.
    pub fn write_text(&self, name: &str, value: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, value.as_bytes())?;
        Ok(path)
    }
}

/// Helper that writes summaries even when a test panics.
pub struct TestReporter {
    /// Artifact manager.
    artifacts: TestArtifacts,
    /// Test name.
    test_name: String,
    /// Start time in epoch milliseconds.
    started_at_ms: u128,
    /// Matrix columns.
    columns: SuiteColumns,
    /// Finished suite reports.
    reports: Vec<SuiteReport>,
    /// Whether the summary was written.
    finalized: bool,
}

impl TestReporter {
    /// Creates a reporter for the named test.
    pub fn new(test_name: &str) -> io::Result<Self> {
        Ok(Self {
            artifacts: TestArtifacts::new(test_name)?,
            test_name: test_name.to_string(),
            started_at_ms: now_millis(),
            columns: SuiteColumns::default(),
            reports: Vec::new(),
            finalized: false,
        })
    }

    /// Returns the artifact manager.
    pub fn artifacts(&self) -> &TestArtifacts {
        &self.artifacts
    }

    /// Records the implemented and not-implemented columns.
    pub fn set_columns(&mut self, columns: SuiteColumns) {
        self.columns = columns;
    }

    /// Records a finished suite report.
    pub fn push_report(&mut self, report: SuiteReport) {
        self.reports.push(report);
    }

    /// Returns the recorded reports.
    pub fn reports(&self) -> &[SuiteReport] {
        &self.reports
    }

    /// Writes the final summary for the test.
    pub fn finish(&mut self, status: &str, notes: Vec<String>) -> io::Result<()> {
        let ended_at_ms = now_millis();
        let summary = TestSummary {
            test_name: self.test_name.clone(),
            status: status.to_string(),
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            columns: &self.columns,
            reports: &self.reports,
            notes,
        };
        self.artifacts.write_json("summary.json", &summary)?;
        let mut markdown = summary_markdown(&self.reports, &self.columns);
        markdown.push_str(&format!("\n## Status\n\n- Test: {}\n- Status: {status}\n", self.test_name));
        for note in &summary.notes {
            markdown.push_str(&format!("- Note: {note}\n"));
        }
        self.artifacts.write_text("summary.md", &markdown)?;
        self.finalized = true;
        Ok(())
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { "panic" } else { "unknown" };
        let _ = self.finish(status, vec!["test terminated without explicit summary".to_string()]);
    }
}
