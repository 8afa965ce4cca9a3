use thiserror::Error;

/// How a per-file failure is reported to batch callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The document parsed but matches no known replay schema.
    Format,
    /// The document could not be read or parsed at all.
    MalformedDocument,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReplayError {
    #[error("Failed to read replay {path}: {message}")]
    Read { path: String, message: String },

    #[error("Malformed replay document: {0}")]
    Malformed(String),

    #[error("Unrecognized replay format")]
    UnrecognizedFormat,

    #[error("Invalid {schema} replay: {message}")]
    InvalidSchema {
        schema: &'static str,
        message: String,
    },

    #[error("No end-of-game record for player {0}")]
    MissingEndContext(String),
}

impl ReplayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ReplayError::Read { .. } | ReplayError::Malformed(_) => FailureKind::MalformedDocument,
            ReplayError::UnrecognizedFormat
            | ReplayError::InvalidSchema { .. }
            | ReplayError::MissingEndContext(_) => FailureKind::Format,
        }
    }
}
