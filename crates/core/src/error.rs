//! Error types shared across the proxima crates

use thiserror::Error;

/// Errors produced by index construction, query, and persistence
#[derive(Debug, Error)]
pub enum ProximaError {
    /// Corpus or parameter validation failed
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// A vector's length disagrees with the configured dimension
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension from the index configuration
        expected: usize,
        /// Actual length of the offending vector
        got: usize,
    },

    /// Query attempted before any index was built or loaded
    #[error("No index available: build or load one first")]
    NotBuilt,

    /// Persisted bytes failed structural validation
    #[error("Corrupt index: {message}")]
    CorruptIndex {
        /// What failed to validate
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Underlying codec error
        message: String,
    },

    /// IO error while reading or writing an artifact
    #[error("IO error: {message}")]
    Io {
        /// Underlying IO error
        message: String,
    },
}

impl ProximaError {
    /// Shorthand constructor for [`ProximaError::InvalidInput`]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ProximaError::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand constructor for [`ProximaError::CorruptIndex`]
    pub fn corrupt(message: impl Into<String>) -> Self {
        ProximaError::CorruptIndex {
            message: message.into(),
        }
    }

    /// Check if this error is a caller-input validation failure
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ProximaError::InvalidInput { .. } | ProximaError::DimensionMismatch { .. }
        )
    }

    /// Check if this error indicates bad persisted state
    pub fn is_corruption(&self) -> bool {
        matches!(self, ProximaError::CorruptIndex { .. })
    }
}

impl From<std::io::Error> for ProximaError {
    fn from(e: std::io::Error) -> Self {
        ProximaError::Io {
            message: e.to_string(),
        }
    }
}

/// Result type alias for proxima operations
pub type ProximaResult<T> = Result<T, ProximaError>;
