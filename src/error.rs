//! Error types for template rendering.
//!
//! Uses thiserror for derive macros. The runtime never recovers from an
//! error locally: every failure is returned to the caller as-is.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for runtime operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The compiled expression is malformed.
    #[error("SyntaxError: {message} at position {position}")]
    Syntax {
        /// What the parser expected or found.
        message: String,
        /// Byte offset into the compiled expression.
        position: usize,
    },

    /// The expression referenced a name other than the two bindings.
    #[error("ReferenceError: {name} is not defined")]
    Reference {
        /// The unresolved identifier.
        name: String,
    },

    /// A value was used in a way its type does not support.
    #[error("TypeError: {0}")]
    Type(String),

    /// Evaluation recursed deeper than the runtime allows.
    #[error("RangeError: {0}")]
    Range(String),

    /// Invalid configuration or command-line input.
    #[error("{0}")]
    UserError(String),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Syntax { .. }
            | Error::Reference { .. }
            | Error::Type(_)
            | Error::Range(_) => exit_codes::RENDER_FAILURE,
            Error::UserError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;
