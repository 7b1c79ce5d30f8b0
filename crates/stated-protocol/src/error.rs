//! Error types for the statement API.

use stated_protocol_core::{CodecError, ValidationError};
use thiserror::Error;

/// Errors that can occur while publishing or ingesting statements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The text could not be built, parsed or verified.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The statement parsed but failed validation.
    #[error("validation error: {0}")]
    Validation(ValidationError),

    /// The configuration requires a signature block and there is none.
    #[error("statement is not signed")]
    SignatureRequired,
}

impl From<ValidationError> for ProtocolError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::Codec(e) => Self::Codec(e),
            other => Self::Validation(other),
        }
    }
}

/// Result type for statement API operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
