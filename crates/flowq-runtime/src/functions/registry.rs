//! Registry of operators, builtins and pipeline functions

use super::{Builtin, PipelineFunction, StageArgs};
use crate::context::EvalContext;
use crate::engine::operators::{self, RegexGuard};
use crate::engine::PreparedExpression;
use crate::error::{Result, RuntimeError};
use flowq_core::ast::{Operator, UnaryOperator};
use flowq_core::Value;

/// Evaluates a prepared expression against data
pub type EvaluateFn = fn(&PreparedExpression, &Value, &EvalContext<'_>) -> Value;

/// Evaluates a prepared expression against data and reduces it to a boolean
pub type ConditionFn = fn(&PreparedExpression, &Value, &EvalContext<'_>) -> bool;

/// Function registry
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    evaluate: EvaluateFn,
    condition: ConditionFn,
    regex: RegexGuard,
}

impl FunctionRegistry {
    /// Create a registry using the given callbacks for nested evaluation
    pub fn new(evaluate: EvaluateFn, condition: ConditionFn) -> Self {
        Self {
            evaluate,
            condition,
            regex: RegexGuard::default(),
        }
    }

    /// Set the compiled-size budget for `matches` patterns
    pub fn with_regex_size_limit(mut self, size_limit: usize) -> Self {
        self.regex = RegexGuard::new(size_limit);
        self
    }

    pub fn regex_guard(&self) -> &RegexGuard {
        &self.regex
    }

    /// True when `name` is a builtin, an operator symbol or a pipeline function
    pub fn has_function(&self, name: &str) -> bool {
        Builtin::from_name(name).is_some() || PipelineFunction::from_name(name).is_some()
    }

    /// Names of all callable functions, operators included
    pub fn function_names(&self) -> Vec<&'static str> {
        Operator::ALL
            .iter()
            .map(Operator::symbol)
            .chain(Builtin::NAMED.iter().map(Builtin::name))
            .chain(PipelineFunction::ALL.iter().map(PipelineFunction::name))
            .chain(["select", "transform"])
            .collect()
    }

    pub fn binary(&self, op: Operator, left: &Value, right: &Value) -> Value {
        operators::execute_binary_op(left, op, right, &self.regex)
    }

    pub fn unary(&self, op: UnaryOperator, operand: &Value) -> Value {
        operators::execute_unary_op(op, operand)
    }

    /// Call a function by name with evaluated arguments.
    ///
    /// Builtins take precedence; a pipeline function treats its first
    /// argument as the input list.
    pub fn call(&self, name: &str, args: &[Value], ctx: &EvalContext<'_>) -> Result<Value> {
        if let Some(builtin) = Builtin::from_name(name) {
            return Ok(builtin.call(args, &self.regex));
        }

        if let Some(function) = PipelineFunction::from_name(name) {
            let (input, rest) = match args.split_first() {
                Some((input, rest)) => (input.clone(), rest),
                None => (Value::Missing, args),
            };
            let stage_args = function.args_from_values(rest);
            return function.apply(&input, &stage_args, ctx);
        }

        Err(RuntimeError::UnknownFunction(name.to_string()))
    }

    /// Apply a pipeline function to a stage value
    pub fn apply_stage(
        &self,
        function: PipelineFunction,
        input: &Value,
        args: &StageArgs,
        ctx: &EvalContext<'_>,
    ) -> Result<Value> {
        function.apply(input, args, ctx)
    }

    /// Evaluate a nested expression
    pub fn evaluate(
        &self,
        expression: &PreparedExpression,
        data: &Value,
        ctx: &EvalContext<'_>,
    ) -> Value {
        (self.evaluate)(expression, data, ctx)
    }

    /// Evaluate a nested condition
    pub fn condition(
        &self,
        expression: &PreparedExpression,
        data: &Value,
        ctx: &EvalContext<'_>,
    ) -> bool {
        (self.condition)(expression, data, ctx)
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new(
            crate::engine::evaluate_prepared,
            crate::engine::evaluate_prepared_condition,
        )
    }
}
