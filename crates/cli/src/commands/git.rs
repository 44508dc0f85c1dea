//! Git Command
//!
//! Shows the commit snapshot the pipeline would stamp into a report.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vitrine_e2e::git::{capture, GitSnapshot};

use crate::output::{print_item, OutputFormat, TableDisplay};

const COMMIT_HASH_DISPLAY_LENGTH: usize = 10;

#[derive(Args)]
pub struct GitArgs {
    /// Repository directory
    #[arg(long, default_value = ".")]
    pub repo_dir: PathBuf,
}

impl TableDisplay for GitSnapshot {
    fn headers() -> Vec<&'static str> {
        vec!["Commit", "Subject", "Author", "Branch", "Date"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            if self.hash.len() > COMMIT_HASH_DISPLAY_LENGTH {
                self.hash[..COMMIT_HASH_DISPLAY_LENGTH].to_string()
            } else {
                self.hash.clone()
            },
            self.message.clone(),
            format!("{} <{}>", self.author, self.email),
            self.branch.clone(),
            self.timestamp.clone(),
        ]
    }
}

pub fn execute(args: GitArgs, format: OutputFormat) -> Result<()> {
    let snapshot = capture(&args.repo_dir)
        .with_context(|| format!("Could not read git metadata in {}", args.repo_dir.display()))?;

    print_item(&snapshot, format);
    Ok(())
}
