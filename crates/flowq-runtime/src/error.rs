//! Runtime error types

use flowq_parser::ParseError;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Function name not present in the registry
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Arguments a function cannot work with
    #[error("Invalid arguments for '{function}': {message}")]
    InvalidArguments { function: String, message: String },

    /// Expression, path or stage text that does not parse
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
