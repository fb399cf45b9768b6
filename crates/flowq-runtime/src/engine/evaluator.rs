//! AST evaluator

use crate::context::EvalContext;
use crate::error::Result;
use crate::template::TemplateResolution;
use flowq_core::ast::{Expression, Operator};
use flowq_core::Value;

/// Evaluate a parsed expression against `data`.
///
/// Only unknown function names fail; every other problem is absorbed into
/// the value (NaN, `false`, missing).
pub fn evaluate_expression(expr: &Expression, data: &Value, ctx: &EvalContext<'_>) -> Result<Value> {
    match expr {
        Expression::Literal(value) => Ok(value.clone()),

        Expression::Identifier(name) => Ok(match data {
            Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Missing),
            _ => Value::Missing,
        }),

        Expression::PathRef(path) => Ok(ctx.paths.evaluate(path, data)),

        Expression::Binary { left, op, right } => {
            let left = evaluate_expression(left, data, ctx)?;
            match op {
                Operator::And if !left.is_truthy() => Ok(left),
                Operator::Or if left.is_truthy() => Ok(left),
                Operator::And | Operator::Or => evaluate_expression(right, data, ctx),
                _ => {
                    let right = evaluate_expression(right, data, ctx)?;
                    Ok(ctx.registry.binary(*op, &left, &right))
                }
            }
        }

        Expression::Unary { op, operand } => {
            let operand = evaluate_expression(operand, data, ctx)?;
            Ok(ctx.registry.unary(*op, &operand))
        }

        Expression::FunctionCall { name, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate_expression(arg, data, ctx))
                .collect::<Result<Vec<_>>>()?;
            ctx.registry.call(name, &args, ctx)
        }

        Expression::Template(text) => Ok(resolve_template(text, ctx)),
    }
}

/// Resolve a template node; unresolved templates evaluate to their raw text
fn resolve_template(text: &str, ctx: &EvalContext<'_>) -> Value {
    let normalized = match text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) => format!("\"{}\"", inner),
        None => text.to_string(),
    };

    match ctx.resolver.resolve(&normalized, ctx.templates) {
        TemplateResolution { success: true, value } => value,
        _ => {
            tracing::debug!("Template '{}' not resolved, keeping raw text", text);
            Value::String(text.to_string())
        }
    }
}
