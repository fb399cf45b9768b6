//! flowq Runtime - evaluation engine for flowq expressions
//!
//! This crate evaluates parsed expressions, paths and pipelines against
//! JSON-like data:
//! - [`path`]: compiled-path cache and step execution
//! - [`engine`]: AST evaluator, operator implementations and the pipeline executor
//! - [`functions`]: the fixed registry of named functions and pipeline stages
//! - [`template`]: the template resolution seam and a default resolver

pub mod context;
pub mod engine;
pub mod error;
pub mod functions;
pub mod path;
pub mod template;

// Re-export main types
pub use context::EvalContext;
pub use engine::{
    evaluate_condition, evaluate_expression, evaluate_prepared, evaluate_prepared_condition,
    evaluate_with_context, try_evaluate, PreparedExpression, RegexGuard, DEFAULT_REGEX_SIZE_LIMIT,
};
pub use error::{Result, RuntimeError};
pub use functions::{Builtin, FunctionRegistry, PipelineFunction, StageArgs};
pub use path::{CompiledPath, PathEvaluator};
pub use template::{ContextResolver, TemplateResolution, TemplateResolver};
