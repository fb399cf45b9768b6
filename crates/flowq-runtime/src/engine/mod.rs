//! Execution engine module
//!
//! Evaluates expression text: pipelines go through the pipeline executor,
//! pure paths through the path evaluator and everything else is parsed and
//! walked by the AST evaluator.

mod evaluator;
pub(crate) mod operators;
pub mod pipeline_executor;

pub use evaluator::evaluate_expression;
pub use operators::{RegexGuard, DEFAULT_REGEX_SIZE_LIMIT};
pub use pipeline_executor::{
    evaluate_condition, evaluate_prepared, evaluate_prepared_condition, evaluate_with_context,
    try_evaluate, PreparedExpression,
};
