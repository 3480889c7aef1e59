use crate::validation::ValidationFailure;

/// Errors raised outside the submission path: loading inputs and resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("form file schema mismatch at {path}: {message}")]
    FormFile { path: String, message: String },
    #[error("invalid address template: {0}")]
    AddressTemplate(serde_json::Error),
    #[error("invalid text: {0}")]
    Text(#[from] registration_types::TextError),
}

pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;

/// Failure reported by the submission collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("registry rejected the patient: {0}")]
    Rejected(String),
    #[error("submission aborted")]
    Aborted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of a submission attempt that did not produce an acknowledgement.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("validation failed: {0}")]
    Validation(ValidationFailure),
    #[error("a submission is already in flight for this form")]
    InFlight,
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl SubmissionError {
    /// Per-field messages when the attempt was blocked by validation.
    pub fn validation_errors(&self) -> Option<&ValidationFailure> {
        match self {
            SubmissionError::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}
