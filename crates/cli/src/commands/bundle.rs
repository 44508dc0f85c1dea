//! Bundle Command
//!
//! Classifies a build artifact against the pipeline's size thresholds.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use vitrine_e2e::bundle::{check_bundle, BundleStatus, BundleVerdict};

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct BundleArgs {
    /// Path to the bundle to check
    #[arg(default_value = "web-components/dist/browser/main.js")]
    pub path: PathBuf,
}

impl TableDisplay for BundleVerdict {
    fn headers() -> Vec<&'static str> {
        vec!["Status", "Size (KB)", "Size (MB)", "Message"]
    }

    fn row(&self) -> Vec<String> {
        let status = match self.status {
            BundleStatus::NotFound => "not_found",
            BundleStatus::Success => "success",
            BundleStatus::Warning => "warning",
            BundleStatus::Error => "error",
        };
        vec![
            status.to_string(),
            format!("{:.2}", self.size_kb),
            format!("{:.2}", self.size_mb),
            self.message.clone(),
        ]
    }
}

pub fn execute(args: BundleArgs, format: OutputFormat) -> Result<()> {
    let verdict = check_bundle(&args.path);
    print_item(&verdict, format);

    if verdict.status == BundleStatus::Error {
        std::process::exit(1);
    }

    Ok(())
}
