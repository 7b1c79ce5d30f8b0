//! Error types for the statement codec.

use thiserror::Error;

/// Errors raised while building, parsing or verifying statements.
///
/// Every field-level variant carries the label of the field that failed,
/// exactly as it appears in the canonical text (e.g. `"Legal form"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed envelope field '{field}': {reason}")]
    MalformedEnvelope { field: String, reason: String },

    #[error("malformed content field '{field}': {reason}")]
    MalformedContent { field: String, reason: String },

    #[error("unknown statement type: {0}")]
    UnknownType(String),

    #[error("statement hash mismatch: declared {declared}, computed {computed}")]
    HashMismatch { declared: String, computed: String },

    #[error("signature verification failed")]
    SignatureInvalid,

    #[error("unsupported format version: {0}")]
    UnsupportedVersion(String),

    #[error("field '{field}' cannot be expressed in format version {version}")]
    UnsupportedField { field: String, version: String },

    #[error("malformed signature block: {0}")]
    MalformedSignature(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

impl CodecError {
    pub(crate) fn envelope(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn content(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The label of the field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MalformedEnvelope { field, .. }
            | Self::MalformedContent { field, .. }
            | Self::UnsupportedField { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Errors from whole-statement validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("invalid attachment reference '{0}'")]
    InvalidAttachment(String),

    #[error("attachment {name} does not match its bytes (computed {computed})")]
    AttachmentMismatch { name: String, computed: String },

    #[error("superseded statement reference is not a statement hash: {0}")]
    InvalidSupersededReference(String),

    #[error("PDF signing statement names no document")]
    MissingDocument,
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
