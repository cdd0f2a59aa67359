use thiserror::Error;

/// Failures raised by the workflow data layer. These travel inside
/// `anyhow::Error` and can be recovered with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Storage not initialized")]
    NotInitialized,

    #[error("Session {0} not found")]
    SessionNotFound(String),

    #[error("Step {0} not found")]
    StepNotFound(String),

    #[error("{field}: {message}")]
    InvalidField {
        field: &'static str,
        message: &'static str,
    },

    #[error("Storage quota exceeded, {size} bytes is over the {quota} byte limit")]
    QuotaExceeded { size: usize, quota: usize },
}
