//! Pipeline Command
//!
//! Runs the full QA pipeline and maps its outcome to the process exit
//! code: zero only for a clean all-passing run, 130/143 when a signal
//! interrupted the run.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use vitrine_e2e::cypress::CypressConfig;
use vitrine_e2e::runner::{Pipeline, PipelineConfig};
use vitrine_e2e::server::WidgetServerConfig;
use vitrine_e2e::{OverallStatus, PipelineError};

use crate::output::{print_error, print_success};

#[derive(Args)]
pub struct PipelineArgs {
    /// Repository directory the git snapshot is taken from
    #[arg(long, default_value = ".")]
    pub repo_dir: PathBuf,

    /// Widget bundle checked against the size thresholds
    #[arg(long, default_value = "web-components/dist/browser/main.js", env = "VITRINE_BUNDLE_PATH")]
    pub bundle: PathBuf,

    /// Directory the rendered reports are written to
    #[arg(long, default_value = "docs/docs/historico")]
    pub report_dir: PathBuf,

    /// Base URL of the catalog service under test
    #[arg(long, default_value = "http://localhost:3001", env = "VITRINE_CATALOG_URL")]
    pub catalog_url: String,

    /// Path to the vitrine-web binary used as the widget host
    #[arg(long, default_value = "target/debug/vitrine-web")]
    pub server_binary: PathBuf,

    /// Directory with the widget build artifacts
    #[arg(long, default_value = "web-components/dist/browser", env = "VITRINE_WIDGET_DIST")]
    pub widget_dist: PathBuf,

    /// Port for the widget host (0 = auto)
    #[arg(long, default_value = "0")]
    pub widget_port: u16,

    /// Seconds to wait for the widget host before continuing anyway
    #[arg(long, default_value = "60")]
    pub startup_timeout: u64,

    /// Command used to launch the suite
    #[arg(long, default_value = "npx")]
    pub suite_command: String,

    /// Directory the suite runs in
    #[arg(long, default_value = ".")]
    pub suite_dir: PathBuf,
}

pub async fn execute(args: PipelineArgs) -> Result<i32> {
    let config = PipelineConfig {
        repo_dir: args.repo_dir,
        bundle_path: args.bundle,
        report_dir: args.report_dir,
        widget_server: WidgetServerConfig {
            binary_path: args.server_binary,
            dist_dir: args.widget_dist,
            port: (args.widget_port != 0).then_some(args.widget_port),
            startup_timeout: Duration::from_secs(args.startup_timeout),
        },
        cypress: CypressConfig {
            command: args.suite_command,
            working_dir: args.suite_dir,
            catalog_url: args.catalog_url,
            ..CypressConfig::default()
        },
    };

    let cancel = CancellationToken::new();
    let signal_code = Arc::new(AtomicI32::new(130));

    // Process signals cancel the run so the widget server is stopped
    // before the process exits
    {
        let cancel = cancel.clone();
        let signal_code = signal_code.clone();
        tokio::spawn(async move {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    signal_code.store(130, Ordering::SeqCst);
                }
                _ = sigterm.recv() => {
                    signal_code.store(143, Ordering::SeqCst);
                }
            }
            cancel.cancel();
        });
    }

    match Pipeline::new(config).run(cancel).await {
        Ok(outcome) => {
            let status_line = match outcome.status {
                OverallStatus::Success => "success".green().bold(),
                OverallStatus::Warning => "warning".yellow().bold(),
                OverallStatus::Failure => "failure".red().bold(),
            };
            println!("Pipeline status: {}", status_line);
            println!("📊 Report: {}", outcome.report_path.display());

            if outcome.exit_code() == 0 {
                print_success("All tests passed!");
            } else {
                print_error("Some tests failed. Check the report for details.");
            }
            Ok(outcome.exit_code())
        }
        Err(PipelineError::Cancelled) => Ok(signal_code.load(Ordering::SeqCst)),
        Err(e) => {
            print_error(&format!("Pipeline error: {}", e));
            Ok(1)
        }
    }
}
