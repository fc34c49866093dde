//! Error types for GameBuddy
//!
//! Startup failures (configuration, catalog, cache) are fatal; everything that
//! can happen while serving a request is recoverable and gets mapped to a
//! structured response at the HTTP boundary.

use thiserror::Error;

/// Main error type for the recommendation service
#[derive(Error, Debug)]
pub enum AgentError {
    /// Missing or malformed environment / tool configuration (startup only)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or malformed catalog or embedding cache (startup only)
    #[error("Data load error: {0}")]
    DataLoadError(String),

    /// Embedding service transport or protocol failure
    #[error("Embedding service error: {0}")]
    EmbeddingServiceError(String),

    /// Remote chat model transport or protocol failure
    #[error("Model service error: {0}")]
    ModelServiceError(String),

    /// Tool lookup, argument binding or execution failure
    #[error("Tool '{tool}' failed: {reason}")]
    ToolDispatchFailure { tool: String, reason: String },

    /// The agent loop ran out of iterations without a final answer
    #[error("Agent produced no final answer within {iterations} iterations")]
    AgentBudgetExceeded { iterations: usize },

    /// Agent loop state machine transition errors
    #[error("Invalid state transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic errors with context
    #[error("Agent error: {0}")]
    Generic(String),
}

impl AgentError {
    /// Whether repeating the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AgentError::EmbeddingServiceError(_)
            | AgentError::ModelServiceError(_)
            | AgentError::Timeout { .. } => true,
            AgentError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Startup-only errors that must abort initialization
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AgentError::ConfigError(_) | AgentError::DataLoadError(_)
        )
    }

    pub(crate) fn tool(tool: &str, reason: impl Into<String>) -> Self {
        AgentError::ToolDispatchFailure {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Convert anyhow errors to AgentError
impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Generic(err.to_string())
    }
}
