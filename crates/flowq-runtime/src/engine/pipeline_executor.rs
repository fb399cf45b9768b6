//! Pipeline executor
//!
//! Top-level evaluation of expression text. This layer never fails:
//! - empty input evaluates to `null`
//! - a pipeline (`a | b(...) | c(...)`) runs stage by stage; a stage that
//!   cannot be parsed or names an unknown function yields `[]` and the
//!   pipeline continues
//! - a pure path goes straight to the path evaluator
//! - anything else is parsed and evaluated; failures evaluate to `null`

use crate::context::EvalContext;
use crate::engine::evaluator::evaluate_expression;
use crate::error::{Result, RuntimeError};
use crate::functions::{Builtin, PipelineFunction};
use flowq_core::ast::Expression;
use flowq_core::Value;
use flowq_parser::{ExpressionParser, ParseError, PipelineParser};

/// Expression text classified once and, for general expressions, parsed.
///
/// Pipeline stages that evaluate the same text for every element prepare
/// it once and reuse the result.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedExpression {
    Empty,
    Pipeline(String),
    Path(String),
    Parsed { source: String, expr: Expression },
    Invalid { source: String, error: ParseError },
}

impl PreparedExpression {
    pub fn new(expression: &str) -> Self {
        let expression = expression.trim();
        if expression.is_empty() {
            return Self::Empty;
        }
        if PipelineParser::is_pipeline(expression) {
            return Self::Pipeline(expression.to_string());
        }
        if PipelineParser::is_pure_path(expression) {
            return Self::Path(expression.to_string());
        }

        let source = expression.to_string();
        match ExpressionParser::parse(expression) {
            Ok(expr) => Self::Parsed { source, expr },
            Err(error) => Self::Invalid { source, error },
        }
    }

    /// The trimmed text this was prepared from
    pub fn source(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Pipeline(source) | Self::Path(source) => source,
            Self::Parsed { source, .. } | Self::Invalid { source, .. } => source,
        }
    }
}

/// Evaluate expression text against `data`
pub fn evaluate_with_context(expression: &str, data: &Value, ctx: &EvalContext<'_>) -> Value {
    evaluate_prepared(&PreparedExpression::new(expression), data, ctx)
}

/// Evaluate an already prepared expression against `data`
pub fn evaluate_prepared(
    prepared: &PreparedExpression,
    data: &Value,
    ctx: &EvalContext<'_>,
) -> Value {
    match try_evaluate_prepared(prepared, data, ctx) {
        Ok(value) => value,
        Err(e) => {
            ctx.report_failure("Expression", prepared.source(), &e);
            Value::Null
        }
    }
}

/// Evaluate expression text and reduce the result to its truthiness
pub fn evaluate_condition(expression: &str, data: &Value, ctx: &EvalContext<'_>) -> bool {
    evaluate_with_context(expression, data, ctx).is_truthy()
}

/// Evaluate a prepared expression and reduce the result to its truthiness
pub fn evaluate_prepared_condition(
    prepared: &PreparedExpression,
    data: &Value,
    ctx: &EvalContext<'_>,
) -> bool {
    evaluate_prepared(prepared, data, ctx).is_truthy()
}

/// Like [`evaluate_with_context`], but parse errors and unknown functions of
/// a plain expression are returned instead of becoming `null`.
///
/// Pipelines and pure paths have no failure mode and always succeed.
pub fn try_evaluate(expression: &str, data: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    try_evaluate_prepared(&PreparedExpression::new(expression), data, ctx)
}

fn try_evaluate_prepared(
    prepared: &PreparedExpression,
    data: &Value,
    ctx: &EvalContext<'_>,
) -> Result<Value> {
    match prepared {
        PreparedExpression::Empty => Ok(Value::Null),
        PreparedExpression::Pipeline(source) => Ok(execute_pipeline(source, data, ctx)),
        PreparedExpression::Path(source) => Ok(ctx.paths.evaluate(source, data)),
        PreparedExpression::Parsed { expr, .. } => evaluate_expression(expr, data, ctx),
        PreparedExpression::Invalid { error, .. } => Err(error.clone().into()),
    }
}

fn parse_and_evaluate(expression: &str, data: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let expr = ExpressionParser::parse(expression)?;
    evaluate_expression(&expr, data, ctx)
}

fn execute_pipeline(expression: &str, data: &Value, ctx: &EvalContext<'_>) -> Value {
    let stages = PipelineParser::split_stages(expression);
    tracing::debug!("Executing pipeline with {} stages", stages.len());

    let mut stages = stages.iter();
    let mut current = match stages.next() {
        Some(first) => initial_value(first, data, ctx),
        None => return Value::Null,
    };

    for stage in stages {
        current = match execute_stage(stage, &current, data, ctx) {
            Ok(value) => value,
            Err(e) => {
                ctx.report_failure("Pipeline stage", stage, &e);
                Value::Array(vec![])
            }
        };
    }

    current
}

/// Stage 0 selects the pipeline input
fn initial_value(stage: &str, data: &Value, ctx: &EvalContext<'_>) -> Value {
    if stage == "data" {
        return data.clone();
    }
    if stage.starts_with('$') {
        return evaluate_with_context(stage, data, ctx);
    }

    // A leading cast applies to the outer data: `int(0) | ...`
    if let Ok(call) = PipelineParser::parse_stage(stage) {
        if let Some(builtin) = Builtin::from_name(&call.name).filter(Builtin::is_cast) {
            let mut args = vec![data.clone()];
            args.extend(evaluate_arguments(&call.args, data, ctx));
            return builtin.call(&args, ctx.registry.regex_guard());
        }
    }

    match parse_and_evaluate(stage, data, ctx) {
        Ok(value) => value,
        Err(e) => {
            ctx.report_failure("Pipeline input", stage, &e);
            Value::Null
        }
    }
}

/// Run one `name(args)` stage on the running value.
///
/// Pipeline functions come first; any builtin also works as a stage, with
/// the running value as its first argument.
fn execute_stage(stage: &str, input: &Value, data: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    let call = PipelineParser::parse_stage(stage)?;

    if let Some(function) = PipelineFunction::from_name(&call.name) {
        let args = function.parse_args(&call.args, data, ctx)?;
        return ctx.registry.apply_stage(function, input, &args, ctx);
    }

    if let Some(builtin) = Builtin::from_name(&call.name) {
        let mut args = vec![input.clone()];
        args.extend(evaluate_arguments(&call.args, data, ctx));
        return Ok(builtin.call(&args, ctx.registry.regex_guard()));
    }

    Err(RuntimeError::UnknownFunction(call.name))
}

/// Evaluate comma-separated argument text against the outer data
fn evaluate_arguments(args: &str, data: &Value, ctx: &EvalContext<'_>) -> Vec<Value> {
    PipelineParser::split_arguments(args)
        .iter()
        .map(|arg| evaluate_with_context(arg, data, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionRegistry;
    use crate::path::PathEvaluator;
    use crate::template::ContextResolver;
    use flowq_core::TemplateContext;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn eval(expression: &str, data: serde_json::Value) -> Value {
        let paths = PathEvaluator::new();
        let registry = FunctionRegistry::default();
        let templates = TemplateContext::new();
        let ctx = EvalContext::new(&paths, &registry, &templates, &ContextResolver);
        evaluate_with_context(expression, &Value::from(data), &ctx)
    }

    #[test]
    fn test_empty_expression_is_null() {
        assert_eq!(eval("   ", json!({})), Value::Null);
    }

    #[test]
    fn test_parse_failure_is_null() {
        assert_eq!(eval("$.a ==", json!({"a": 1})), Value::Null);
        assert_eq!(eval("nope(1)", json!({})), Value::Null);
    }

    #[test]
    fn test_pipeline_input_forms() {
        let data = json!({"items": [1, 2, 3]});
        assert_eq!(eval("data | keys() | count()", data.clone()), Value::from(1));
        assert_eq!(eval("$.items | count()", data.clone()), Value::from(3));
        assert_eq!(eval("10 | add(5)", data.clone()), Value::from(15));
        assert_eq!(eval("@@ | count()", data), Value::from(0));
    }

    #[test]
    fn test_leading_cast_applies_to_data() {
        assert_eq!(eval("int() | add(1)", json!("41")), Value::from(42));
        assert_eq!(eval("float(0) | add(1)", json!("x")), Value::from(1));
    }

    #[test]
    fn test_failing_stage_yields_empty_list_and_continues() {
        let data = json!({"items": [1, 2]});
        assert_eq!(eval("$.items | explode() | count()", data.clone()), Value::from(0));
        assert_eq!(eval("$.items | where($.a | count()", data), Value::from(json!([])));
    }

    #[test]
    fn test_builtin_as_stage() {
        assert_eq!(eval("$.p | round(1)", json!({"p": 2.46})), Value::from(2.5));
        assert_eq!(eval("$.xs | max()", json!({"xs": [3, 9, 4]})), Value::from(9));
        assert_eq!(eval("$.s | contains('ell')", json!({"s": "hello"})), Value::Bool(true));
    }

    #[test]
    fn test_prepared_expression_classification() {
        assert_eq!(PreparedExpression::new("  "), PreparedExpression::Empty);
        assert_eq!(
            PreparedExpression::new(" $.a.b "),
            PreparedExpression::Path("$.a.b".to_string())
        );
        assert!(matches!(
            PreparedExpression::new("$.xs | count()"),
            PreparedExpression::Pipeline(_)
        ));
        assert!(matches!(
            PreparedExpression::new("$.a > 1"),
            PreparedExpression::Parsed { .. }
        ));
        let invalid = PreparedExpression::new("$.a ==");
        assert!(matches!(invalid, PreparedExpression::Invalid { .. }));
        assert_eq!(invalid.source(), "$.a ==");
    }

    #[test]
    fn test_prepared_expression_is_reusable_across_data() {
        let paths = PathEvaluator::new();
        let registry = FunctionRegistry::default();
        let templates = TemplateContext::new();
        let ctx = EvalContext::new(&paths, &registry, &templates, &ContextResolver);

        let prepared = PreparedExpression::new("$.a * 2 + 1");
        let results: Vec<Value> = [1, 2, 3]
            .into_iter()
            .map(|a| evaluate_prepared(&prepared, &Value::from(json!({"a": a})), &ctx))
            .collect();
        assert_eq!(results, vec![Value::from(3), Value::from(5), Value::from(7)]);

        let invalid = PreparedExpression::new("$.a ==");
        assert_eq!(evaluate_prepared(&invalid, &Value::from(json!({"a": 1})), &ctx), Value::Null);
        assert!(try_evaluate("$.a ==", &Value::from(json!({})), &ctx).is_err());
    }

    #[test]
    fn test_stage_arguments_use_outer_data() {
        let data = json!({"n": 2, "items": [1, 2, 3, 4]});
        assert_eq!(eval("$.items | take($.n)", data.clone()), Value::from(json!([1, 2])));
        assert_eq!(eval("$.items | skip($.n)", data), Value::from(json!([3, 4])));
    }
}
