//! Error definitions for pipeline execution.

use thiserror::Error;

/// Errors that can settle a pipeline or a single remote call.
///
/// A stage failure is forwarded to the caller unchanged; the pipeline never
/// wraps it in a way that loses the original kind or message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The transport layer failed (pool shut down, connection problem).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote service rejected or failed the request.
    #[error("remote service error: {0}")]
    RemoteService(String),

    /// The pipeline was cancelled before it could settle.
    #[error("pipeline cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Message suitable for textual rendering to an end user.
    pub fn message(&self) -> String {
        match self {
            PipelineError::Transport(msg) | PipelineError::RemoteService(msg) => msg.clone(),
            PipelineError::Cancelled => "pipeline cancelled".to_string(),
        }
    }
}

/// Result type for pipeline and remote-call operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::RemoteService("quota exceeded".to_string());
        assert_eq!(err.to_string(), "remote service error: quota exceeded");
        assert_eq!(err.message(), "quota exceeded");

        let err = PipelineError::Transport("pool is shut down".to_string());
        assert_eq!(err.to_string(), "transport error: pool is shut down");

        assert_eq!(PipelineError::Cancelled.to_string(), "pipeline cancelled");
    }
}
