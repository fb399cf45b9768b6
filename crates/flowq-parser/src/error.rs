//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Invalid expression syntax
    #[error("Invalid expression syntax: {0}")]
    InvalidExpression(String),

    /// Character no token rule accepts
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// Token in a position the grammar does not allow
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    /// Input ended while more tokens were required
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// `(` without its `)`
    #[error("Missing closing parenthesis")]
    UnclosedParenthesis,

    /// Function argument list that is not `expr, expr, ...`
    #[error("Malformed argument list for '{0}'")]
    MalformedArguments(String),

    /// Path that cannot be compiled
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// Pipeline stage that is not `name(args)`
    #[error("Invalid pipeline stage: {0}")]
    InvalidStage(String),
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
