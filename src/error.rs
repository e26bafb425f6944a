//! Error types.
//!
//! [`AnalysisError`] covers a failed round trip to a result provider. Every
//! variant collapses to one user-facing message; the variant itself only
//! reaches the log. [`AppError`] covers setting up and driving the terminal
//! application.

use std::io;

/// The single message shown to the user for any failed analysis.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze symptoms. Please try again.";

/// Why an analysis request failed.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The request never produced a response (connect, DNS, timeout, ...).
    #[error("analysis request failed in transport: {0}")]
    Transport(#[source] reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("analysis endpoint returned HTTP {0}")]
    Status(u16),
    /// The response body was not the expected JSON shape.
    #[error("analysis response could not be decoded: {0}")]
    Decode(String),
}

impl AnalysisError {
    /// The message to show in the error region.
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AnalysisError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            AnalysisError::Status(status.as_u16())
        } else {
            AnalysisError::Transport(err)
        }
    }
}

/// Errors raised while building or running the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Terminal setup, input, or output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured analysis endpoint is not a valid URL.
    #[error("invalid analysis endpoint {url:?}: {message}")]
    Endpoint { url: String, message: String },
    /// The page could not be laid out.
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),
    /// The log file could not be opened or the subscriber installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
