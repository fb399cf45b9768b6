//! Unary operator execution

use flowq_core::ast::UnaryOperator;
use flowq_core::Value;

/// Execute a unary operation
pub(crate) fn execute_unary_op(op: UnaryOperator, operand: &Value) -> Value {
    match op {
        UnaryOperator::Not => Value::Bool(!operand.is_truthy()),
        UnaryOperator::Negate => match operand.to_number() {
            Some(n) => Value::Number(-n),
            None => Value::NAN,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_uses_truthiness() {
        assert_eq!(execute_unary_op(UnaryOperator::Not, &Value::from("")), Value::Bool(true));
        assert_eq!(execute_unary_op(UnaryOperator::Not, &Value::Array(vec![])), Value::Bool(false));
        assert_eq!(execute_unary_op(UnaryOperator::Not, &Value::Missing), Value::Bool(true));
    }

    #[test]
    fn test_negate() {
        assert_eq!(execute_unary_op(UnaryOperator::Negate, &Value::from("4")), Value::from(-4));
        assert!(execute_unary_op(UnaryOperator::Negate, &Value::Null).is_nan());
    }
}
