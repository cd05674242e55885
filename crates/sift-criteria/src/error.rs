//! Error types for building criteria.
//!
//! Every builder operation validates its input synchronously and reports the first
//! violated precondition through [`CriteriaError`]. A failed call leaves the node and
//! its chain untouched.

use thiserror::Error;

/// Errors raised while building a criteria chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// The field reference is missing or has an empty name.
    #[error("invalid field: {message}")]
    InvalidField {
        /// Error message.
        message: String,
    },

    /// An operand violates the preconditions of the builder operation.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Error message.
        message: String,
    },

    /// A criteria could not be linked into a chain.
    #[error("invalid chain link: {message}")]
    InvalidChainLink {
        /// Error message.
        message: String,
    },
}

impl CriteriaError {
    /// Creates an invalid field error.
    pub(crate) fn invalid_field(message: impl Into<String>) -> Self {
        Self::InvalidField {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid chain link error.
    pub(crate) fn invalid_chain_link(message: impl Into<String>) -> Self {
        Self::InvalidChainLink {
            message: message.into(),
        }
    }

    /// Returns the error message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidField { message }
            | Self::InvalidArgument { message }
            | Self::InvalidChainLink { message } => message,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { message } if message.starts_with("cannot construct query") => {
                Some("Use expression() or one clause per term for values containing spaces")
            }
            Self::InvalidArgument { message } if message.contains("multiple terms") => {
                Some("Use is() or fuzzy() for single-term values")
            }
            Self::InvalidChainLink { message } if message.contains("shared") => {
                Some("Drop other handles to the criteria before appending it, or use or_criteria()")
            }
            Self::InvalidChainLink { message } if message.contains("already chained") => {
                Some("Append standalone criteria built with Criteria::new(), or use or_criteria()")
            }
            _ => None,
        }
    }
}
