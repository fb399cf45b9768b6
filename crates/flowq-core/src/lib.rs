//! flowq Core - Core types and definitions for the flowq query engine
//!
//! This crate provides the fundamental types used across the flowq crates:
//! - Value types for runtime data (with `Missing` kept apart from `Null`)
//! - AST (Abstract Syntax Tree) definitions for expressions and paths
//! - The template context threaded through evaluation
//! - Error types

pub mod ast;
pub mod context;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use context::{TemplateContext, TemplateFunction};
pub use error::CoreError;
pub use types::{Map, Value};
