//! Abstract Syntax Tree (AST) definitions for flowq
//!
//! This module contains the AST node definitions for:
//! - Expressions
//! - Operators
//! - Compiled path steps

pub mod expression;
pub mod operator;
pub mod path;

pub use expression::{Expression, UnaryOperator};
pub use operator::Operator;
pub use path::{IndexSelector, PathStep};
