//! Handler and problem-source traits plus shared error types.

use crate::problems::{DefaultNotification, Problem};

/// Errors raised while talking to the problem-details API.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A received notification together with the problem it refers to.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProblemEvent {
    pub notification: DefaultNotification,
    pub problem: Problem,
}

/// Receives every problem notification that passed validation and whose
/// details could be looked up.
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, event: ProblemEvent);

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Looks up full problem details by problem id.
#[async_trait::async_trait]
pub trait ProblemSource: Send + Sync {
    async fn problem(&self, pid: &str) -> Result<Problem, NotifyError>;
}
