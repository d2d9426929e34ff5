//! Error types for workflow runs

use comply_config::ConfigurationError;

/// Workflow error type
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Validators produced results at or above the failing severity
    #[error("{count} policy violations at or above the failing severity")]
    PolicyViolations { count: usize },

    /// Configurations could not be loaded or merged without conflicts
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
