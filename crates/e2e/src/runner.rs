//! Pipeline orchestrator
//!
//! Sequences the QA run: capture git metadata, classify the bundle, bring
//! up the widget host, execute the suite, and always render a report —
//! whatever happened to the tests. Cancellation arrives through a token
//! and cleanup order is deterministic: the widget server stops before the
//! run function returns.

use std::path::PathBuf;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::bundle::check_bundle;
use crate::cypress::{self, CypressConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::git;
use crate::report::{render_report, save_report, OverallStatus};
use crate::results::RunSummary;
use crate::server::{WidgetServerConfig, WidgetServerHandle};

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Repository the git snapshot is taken from
    pub repo_dir: PathBuf,

    /// Build artifact checked against the size thresholds
    pub bundle_path: PathBuf,

    /// Directory the rendered reports are written to
    pub report_dir: PathBuf,

    pub widget_server: WidgetServerConfig,
    pub cypress: CypressConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("."),
            bundle_path: PathBuf::from("web-components/dist/browser/main.js"),
            report_dir: PathBuf::from("docs/docs/historico"),
            widget_server: WidgetServerConfig::default(),
            cypress: CypressConfig::default(),
        }
    }
}

/// What a finished run produced
#[derive(Debug)]
pub struct PipelineOutcome {
    pub summary: RunSummary,
    pub status: OverallStatus,
    pub report_path: PathBuf,
}

impl PipelineOutcome {
    /// Zero only for a run with no failed tests
    pub fn exit_code(&self) -> i32 {
        if self.summary.total_failed > 0 {
            1
        } else {
            0
        }
    }
}

/// The QA pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run every step and emit the report. The outer contract is "always
    /// emit a report": a failing or crashing suite still produces one,
    /// only cancellation or an unwritable report directory does not.
    pub async fn run(&self, cancel: CancellationToken) -> PipelineResult<PipelineOutcome> {
        info!("Starting QA pipeline...");

        let git = git::capture_or_placeholder(&self.config.repo_dir, Utc::now());
        info!(
            "Commit: {} - {} ({})",
            git.short_hash, git.message, git.branch
        );

        let bundle = check_bundle(&self.config.bundle_path);
        info!("{}", bundle.message);

        let mut widget = match WidgetServerHandle::spawn(self.config.widget_server.clone()).await
        {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Widget server unavailable: {}", e);
                None
            }
        };

        let mut cypress_config = self.config.cypress.clone();
        if let Some(handle) = &widget {
            cypress_config.widget_url = Some(handle.base_url.clone());
        }

        let suite = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Cancellation requested; stopping widget server");
                if let Some(handle) = &mut widget {
                    handle.stop();
                }
                return Err(PipelineError::Cancelled);
            }
            result = cypress::run_suite(&cypress_config) => result,
        };

        let summary = match suite {
            Ok(summary) => summary,
            Err(e) => {
                error!("Test execution failed: {}", e);
                RunSummary::synthetic_failure()
            }
        };

        let report = render_report(&summary, &git, &bundle, Utc::now());
        let saved = save_report(&self.config.report_dir, &report);

        if let Some(handle) = &mut widget {
            handle.stop();
        }

        let report_path = saved?;
        let status = OverallStatus::from_summary(&summary);

        info!("Pipeline finished with status: {}", status.label());

        Ok(PipelineOutcome {
            summary,
            status,
            report_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir, suite_script: &str) -> PipelineConfig {
        std::fs::create_dir_all(dir.path().join("cypress/results")).unwrap();
        PipelineConfig {
            repo_dir: dir.path().to_path_buf(),
            bundle_path: dir.path().join("main.js"),
            report_dir: dir.path().join("historico"),
            widget_server: WidgetServerConfig {
                dist_dir: dir.path().join("no-dist"),
                ..WidgetServerConfig::default()
            },
            cypress: CypressConfig {
                command: "sh".to_string(),
                args: vec!["-c".to_string(), suite_script.to_string()],
                working_dir: dir.path().to_path_buf(),
                ..CypressConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn clean_run_reports_success_and_exit_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(
            &dir,
            r#"printf '{"totalTests":2,"totalPassed":2,"totalDuration":800}' \
               > cypress/results/results.json"#,
        );

        let outcome = Pipeline::new(config)
            .run(CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.status, OverallStatus::Success);
        assert_eq!(outcome.exit_code(), 0);

        let content = std::fs::read_to_string(&outcome.report_path).unwrap();
        assert!(content.contains("**Status:** SUCCESS"));
        // Git metadata degraded to the placeholder outside a repository
        assert!(content.contains("Autor: Unknown <unknown@example.com>"));
        // Missing bundle degraded to the not-found verdict
        assert!(content.contains("Bundle Não Encontrado"));
    }

    #[tokio::test]
    async fn crashed_suite_still_emits_a_failure_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "exit 7");

        let outcome = Pipeline::new(config)
            .run(CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.status, OverallStatus::Failure);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.summary.total_failed, 1);
        assert!(outcome.report_path.exists());
    }

    #[tokio::test]
    async fn cancellation_stops_the_run_without_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir, "sleep 30");
        let report_dir = config.report_dir.clone();

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = Pipeline::new(config).run(cancel).await.unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled));
        assert!(!report_dir.exists());
    }
}
