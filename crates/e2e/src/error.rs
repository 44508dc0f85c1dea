//! Error types for the QA pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Widget server failed to start: {0}")]
    ServerStartup(String),

    #[error("Git metadata unavailable: {0}")]
    Git(String),

    #[error("Cypress not found. Install with: npm install cypress")]
    CypressNotFound,

    #[error("Test execution failed: {0}")]
    TestExecution(String),

    #[error("Results parse error: {0}")]
    ResultsParse(String),

    #[error("Pipeline cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
