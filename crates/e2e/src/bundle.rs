//! Bundle size validation
//!
//! Classifies the widget build artifact against the fixed size thresholds.
//! A pure function of the stat result: no retries, no side effects.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Hard limit: bundles above this fail the check
pub const BUNDLE_MAX_SIZE: u64 = 1024 * 1024;

/// Soft limit: bundles above this are flagged as large
pub const BUNDLE_WARNING_SIZE: u64 = 500 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleStatus {
    NotFound,
    Success,
    Warning,
    Error,
}

/// Outcome of a bundle size check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleVerdict {
    pub exists: bool,
    pub size: u64,
    pub size_kb: f64,
    pub size_mb: f64,
    pub status: BundleStatus,
    pub message: String,
}

impl BundleVerdict {
    fn absent(message: String, status: BundleStatus) -> Self {
        Self {
            exists: false,
            size: 0,
            size_kb: 0.0,
            size_mb: 0.0,
            status,
            message,
        }
    }
}

/// Classify the artifact at `path`
pub fn check_bundle(path: &Path) -> BundleVerdict {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return BundleVerdict::absent(
                "⚠️ Bundle file not found. Build the widget bundle first.".to_string(),
                BundleStatus::NotFound,
            );
        }
        Err(e) => {
            return BundleVerdict::absent(
                format!("❌ Error reading bundle: {}", e),
                BundleStatus::Error,
            );
        }
    };

    let size = metadata.len();
    let size_kb = round2(size as f64 / 1024.0);
    let size_mb = round2(size as f64 / (1024.0 * 1024.0));

    let (status, message) = if size > BUNDLE_MAX_SIZE {
        (
            BundleStatus::Error,
            format!(
                "❌ Bundle exceeds maximum size! {:.2} KB > {:.0} KB",
                size_kb,
                BUNDLE_MAX_SIZE as f64 / 1024.0
            ),
        )
    } else if size > BUNDLE_WARNING_SIZE {
        (
            BundleStatus::Warning,
            format!(
                "⚠️ Bundle size is large: {:.2} KB (Warning threshold: {:.0} KB)",
                size_kb,
                BUNDLE_WARNING_SIZE as f64 / 1024.0
            ),
        )
    } else {
        (
            BundleStatus::Success,
            format!("✅ Bundle size: {:.2} KB", size_kb),
        )
    };

    BundleVerdict {
        exists: true,
        size,
        size_kb,
        size_mb,
        status,
        message,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
