use thiserror::Error;

/// Failures at the question generation boundary.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Please enter a job role first.")]
    MissingRole,

    #[error("Total questions must be between 1 and {max} (got {0})", max = crate::generator::MAX_TOTAL_QUESTIONS)]
    InvalidQuestionCount(usize),

    #[error("No response from the model.")]
    EmptyResponse,

    #[error("{provider}: {message}")]
    Provider { provider: String, message: String },
}
