//! Error types for the expression front end.

use thiserror::Error;

/// Result type for expression-engine operations.
pub type ExprResult<T> = Result<T, ExpressionError>;

/// Errors that can occur while building the vocabulary or processing an
/// expression.
///
/// All four kinds are fatal to the call that raised them: no partial results
/// are produced. Only the first lexical or grammatical error encountered is
/// reported; later errors in the same input are discarded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// The vocabulary was built from empty or malformed metadata, or a
    /// method was invoked before `init()`.
    #[error("invalid engine configuration: {0}")]
    Configuration(String),

    /// A segment of the input could not be matched by any token pattern.
    #[error("{message}")]
    Lex {
        /// Human-readable description, including the offending substring.
        message: String,
        /// Byte offset of the unmatched segment in the original input.
        offset: usize,
    },

    /// The token stream violates the expression grammar.
    #[error("{0}")]
    Parse(String),

    /// An implicit "previous result" reference could not be resolved
    /// because no prior computed column exists.
    #[error("cannot resolve implicit column reference: {0}")]
    Resolution(String),
}

impl ExpressionError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ExpressionError::Configuration(message.into())
    }

    /// Shorthand for a grammar error.
    pub fn parse(message: impl Into<String>) -> Self {
        ExpressionError::Parse(message.into())
    }
}
