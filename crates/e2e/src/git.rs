//! Git metadata capture
//!
//! A snapshot of the current HEAD, taken once per pipeline run. When git
//! is unavailable the pipeline substitutes a placeholder record instead
//! of aborting.

use std::path::Path;
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PipelineError, PipelineResult};

/// Point-in-time commit metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSnapshot {
    pub author: String,
    pub email: String,
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub branch: String,
    pub timestamp: String,
}

impl GitSnapshot {
    /// The record used when git metadata cannot be captured
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self {
            author: "Unknown".to_string(),
            email: "unknown@example.com".to_string(),
            hash: "N/A".to_string(),
            short_hash: "N/A".to_string(),
            message: "No commit message".to_string(),
            branch: "unknown".to_string(),
            timestamp: now.to_rfc3339(),
        }
    }
}

/// Capture HEAD metadata from the repository at `repo_dir`
pub fn capture(repo_dir: &Path) -> PipelineResult<GitSnapshot> {
    let log = run_git(
        repo_dir,
        &["log", "-1", "--pretty=format:%an%n%ae%n%H%n%h%n%s%n%ci"],
    )?;
    let lines: Vec<&str> = log.lines().collect();
    if lines.len() < 6 {
        return Err(PipelineError::Git(format!(
            "unexpected log output: {}",
            log
        )));
    }

    let branch = run_git(repo_dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;

    Ok(GitSnapshot {
        author: lines[0].to_string(),
        email: lines[1].to_string(),
        hash: lines[2].to_string(),
        short_hash: lines[3].to_string(),
        message: lines[4].to_string(),
        branch: branch.trim().to_string(),
        timestamp: lines[5].to_string(),
    })
}

/// Capture HEAD metadata, degrading to the placeholder on any failure
pub fn capture_or_placeholder(repo_dir: &Path, now: DateTime<Utc>) -> GitSnapshot {
    match capture(repo_dir) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Could not retrieve git metadata: {}", e);
            GitSnapshot::placeholder(now)
        }
    }
}

fn run_git(repo_dir: &Path, args: &[&str]) -> PipelineResult<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .map_err(|e| PipelineError::Git(format!("failed to execute git: {}", e)))?;

    if !output.status.success() {
        return Err(PipelineError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(capture(dir.path()).is_err());
    }

    #[test]
    fn placeholder_is_substituted_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now();
        let snapshot = capture_or_placeholder(dir.path(), now);
        assert_eq!(snapshot.author, "Unknown");
        assert_eq!(snapshot.short_hash, "N/A");
        assert_eq!(snapshot.branch, "unknown");
        assert_eq!(snapshot.timestamp, now.to_rfc3339());
    }
}
