//! Function registry
//!
//! A fixed, closed set of named functions:
//! - [`Builtin`]: operators and helpers callable from any expression
//! - [`PipelineFunction`]: list transformations usable as pipeline stages
//!
//! The registry holds the callbacks it uses to evaluate nested expressions
//! (filter conditions, mapping expressions, stage arguments). Those are
//! injected at construction.

mod builtins;
mod pipeline;
mod registry;

pub use builtins::Builtin;
pub use pipeline::{PipelineFunction, StageArgs};
pub use registry::{ConditionFn, EvaluateFn, FunctionRegistry};
