use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Boxed drawing error produced by the plotters backend.
pub type PlotError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid branch pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("No data to report: {0}")]
    NoData(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
