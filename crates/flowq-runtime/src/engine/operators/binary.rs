//! Binary operator execution

use super::comparison::execute_compare;
use super::string::{self, RegexGuard};
use flowq_core::ast::Operator;
use flowq_core::Value;

/// Execute a binary operation on already evaluated operands.
///
/// `&&` and `||` return the deciding operand; the evaluator short-circuits
/// them before reaching this point.
pub(crate) fn execute_binary_op(
    left: &Value,
    op: Operator,
    right: &Value,
    regex: &RegexGuard,
) -> Value {
    match op {
        Operator::Eq | Operator::Ne | Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
            Value::Bool(execute_compare(left, op, right))
        }
        Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Mod => {
            lenient_arithmetic(left, op, right)
        }
        Operator::And => {
            if left.is_truthy() {
                right.clone()
            } else {
                left.clone()
            }
        }
        Operator::Or => {
            if left.is_truthy() {
                left.clone()
            } else {
                right.clone()
            }
        }
        Operator::Contains => Value::Bool(string::contains(left, right)),
        Operator::StartsWith => Value::Bool(string::starts_with(left, right)),
        Operator::EndsWith => Value::Bool(string::ends_with(left, right)),
        Operator::Matches => Value::Bool(string::matches(left, right, regex)),
    }
}

/// Coerce both operands; anything not coercible makes the result NaN
fn lenient_arithmetic(left: &Value, op: Operator, right: &Value) -> Value {
    match (left.to_number(), right.to_number()) {
        (Some(l), Some(r)) => Value::Number(arithmetic(l, op, r)),
        _ => {
            tracing::debug!(
                "Non-numeric operand in {} {} {}, returning NaN",
                left.type_name(),
                op,
                right.type_name()
            );
            Value::NAN
        }
    }
}

/// Numeric core shared by the lenient operators and the strict pipeline functions
pub(crate) fn arithmetic(l: f64, op: Operator, r: f64) -> f64 {
    match op {
        Operator::Add => l + r,
        Operator::Sub => l - r,
        Operator::Mul => l * r,
        Operator::Div => {
            if r == 0.0 {
                if l == 0.0 || l.is_nan() {
                    f64::NAN
                } else if l > 0.0 {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                }
            } else {
                l / r
            }
        }
        // x % 0 is NaN for f64
        Operator::Mod => l % r,
        _ => f64::NAN,
    }
}
