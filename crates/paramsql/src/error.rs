//! Error types for paramsql

use crate::builder::Action;
use thiserror::Error;

/// Result type alias for paramsql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while describing or compiling a statement.
///
/// All variants are local precondition violations; none of them are transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A string was rejected as a column/table identifier
    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// A condition operand has the wrong shape for its operator
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// INSERT or UPDATE built without any SET data
    #[error("{0} data is empty")]
    EmptyMutationData(Action),

    /// Unknown action tag
    #[error("Unsupported build action: {0}")]
    UnsupportedAction(String),
}

impl Error {
    /// Create an invalid identifier error
    pub fn invalid_identifier(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Check if this is an identifier validation error
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, Self::InvalidIdentifier { .. })
    }

    /// Check if this is an empty mutation data error
    pub fn is_empty_mutation_data(&self) -> bool {
        matches!(self, Self::EmptyMutationData(_))
    }
}
