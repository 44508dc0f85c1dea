//! Vitrine QA Pipeline
//!
//! This crate drives the end-to-end QA run for the Vitrine stack:
//! - Captures git metadata for the report header
//! - Classifies the widget bundle against fixed size thresholds
//! - Spawns the widget host and waits for an HTTP readiness probe
//! - Runs the Cypress suite and collects the reporter's JSON results
//! - Renders and persists a Markdown regression report, pass or fail
//!
//! # Architecture
//!
//! ```text
//! Pipeline::run(cancel)
//!   ├── git::capture_or_placeholder()        -> GitSnapshot
//!   ├── bundle::check_bundle()               -> BundleVerdict
//!   ├── WidgetServerHandle::spawn()          -> widget host (optional)
//!   ├── cypress::run_suite()                 -> RunSummary
//!   ├── report::render_report() + save_report()
//!   └── WidgetServerHandle::stop()
//! ```

pub mod bundle;
pub mod cypress;
pub mod error;
pub mod git;
pub mod report;
pub mod results;
pub mod runner;
pub mod server;

pub use error::{PipelineError, PipelineResult};
pub use report::OverallStatus;
pub use results::RunSummary;
pub use runner::{Pipeline, PipelineConfig, PipelineOutcome};
