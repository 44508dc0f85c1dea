//! Test run results
//!
//! The aggregate shape the pipeline consumes: overall counters plus the
//! per-spec test records the reporter writes as JSON. Field names follow
//! the Cypress module-API output so the reporter file parses directly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Aggregate result of one suite run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunSummary {
    pub total_tests: u64,
    pub total_passed: u64,
    pub total_failed: u64,
    pub total_pending: u64,
    pub total_skipped: u64,
    /// Wall-clock duration of the whole run in milliseconds
    pub total_duration: u64,
    pub runs: Vec<SpecRun>,
}

/// Results for a single spec file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecRun {
    pub name: String,
    pub tests: Vec<TestRecord>,
}

/// A single executed test
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    /// Title path, outermost describe block first
    pub title: Vec<String>,
    pub state: TestState,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub display_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Passed,
    Failed,
    Pending,
    Skipped,
}

impl TestState {
    /// Glyph used in the rendered report
    pub fn glyph(&self) -> &'static str {
        match self {
            TestState::Passed => "✅",
            TestState::Failed => "❌",
            TestState::Pending | TestState::Skipped => "⏭️",
        }
    }
}

impl RunSummary {
    /// Parse a results file written by the suite reporter
    pub fn from_json_file(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::ResultsParse(format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| PipelineError::ResultsParse(format!("{}: {}", path.display(), e)))
    }

    /// The summary reported when the suite itself could not run
    pub fn synthetic_failure() -> Self {
        Self {
            total_failed: 1,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reporter_output() {
        let json = r#"{
            "totalTests": 3,
            "totalPassed": 2,
            "totalFailed": 1,
            "totalPending": 0,
            "totalSkipped": 0,
            "totalDuration": 4230,
            "runs": [
                {
                    "name": "products.cy.ts",
                    "tests": [
                        {"title": ["Products", "returns all"], "state": "passed", "duration": 310},
                        {"title": ["Products", "filters"], "state": "passed", "duration": 120},
                        {"title": ["Products", "rejects"], "state": "failed",
                         "displayError": "expected 404 to equal 200"}
                    ]
                }
            ]
        }"#;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, json).unwrap();

        let summary = RunSummary::from_json_file(&path).unwrap();
        assert_eq!(summary.total_tests, 3);
        assert_eq!(summary.runs.len(), 1);
        assert_eq!(summary.runs[0].tests[2].state, TestState::Failed);
        assert_eq!(
            summary.runs[0].tests[2].display_error.as_deref(),
            Some("expected 404 to equal 200")
        );
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, r#"{"totalTests": 1}"#).unwrap();

        let summary = RunSummary::from_json_file(&path).unwrap();
        assert_eq!(summary.total_tests, 1);
        assert_eq!(summary.total_failed, 0);
        assert!(summary.runs.is_empty());
    }

    #[test]
    fn unreadable_file_is_a_parse_error() {
        let err = RunSummary::from_json_file(Path::new("/nonexistent/results.json"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::ResultsParse(_)));
    }

    #[test]
    fn synthetic_failure_counts_one_failed_test() {
        let summary = RunSummary::synthetic_failure();
        assert_eq!(summary.total_failed, 1);
        assert_eq!(summary.total_tests, 0);
        assert!(summary.runs.is_empty());
    }
}
