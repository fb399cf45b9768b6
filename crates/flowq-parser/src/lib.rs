//! flowq Parser - text to AST for the flowq query engine
//!
//! This crate turns expression text into structures the runtime evaluates:
//! - [`lexer`]: regex-driven tokenizer
//! - [`ExpressionParser`]: recursive-descent, precedence-climbing parser
//! - [`PathParser`]: compiles `$.a[0].b[*]` style paths into steps
//! - [`PipelineParser`]: splits `a | b(...) | c(...)` pipelines and parses
//!   stage arguments

pub mod error;
pub mod expression_parser;
pub mod lexer;
pub mod path_parser;
pub mod pipeline_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use expression_parser::ExpressionParser;
pub use lexer::{strip_quotes, tokenize, unquote, Token, TokenKind};
pub use path_parser::PathParser;
pub use pipeline_parser::{PipelineParser, SortSpec, StageCall};
