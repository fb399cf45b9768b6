//! Comparison operator execution

use flowq_core::ast::Operator;
use flowq_core::Value;
use std::cmp::Ordering;

/// Execute a comparison operation.
///
/// Equality is strict: no coercion, so `1 == "1"` is false. Relational
/// operators coerce both sides to numbers and are false when either side
/// does not coerce (null and missing never do).
pub(crate) fn execute_compare(left: &Value, op: Operator, right: &Value) -> bool {
    match op {
        Operator::Eq => left == right,
        Operator::Ne => left != right,
        _ => {
            let (Some(l), Some(r)) = (left.to_number(), right.to_number()) else {
                tracing::debug!(
                    "Relational {} on {} and {}, returning false",
                    op,
                    left.type_name(),
                    right.type_name()
                );
                return false;
            };
            match op {
                Operator::Gt => l > r,
                Operator::Ge => l >= r,
                Operator::Lt => l < r,
                Operator::Le => l <= r,
                _ => false,
            }
        }
    }
}

/// Total order used by `sort`: null, then missing, then defined values.
///
/// Two keys that both coerce to numbers compare numerically; any other pair
/// of defined keys compares by text form with [`collate_text`].
pub(crate) fn compare_sort_keys(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Missing => 1,
            _ => 2,
        }
    }

    match rank(a).cmp(&rank(b)) {
        Ordering::Equal if rank(a) == 2 => match (a.to_number(), b.to_number()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => collate_text(&a.to_text(), &b.to_text()),
        },
        other => other,
    }
}

/// Dictionary order: letters compare case-insensitively first, then
/// lowercase sorts before uppercase, then code points decide.
fn collate_text(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(a)
        .cmp(&folded(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equality() {
        assert!(execute_compare(&Value::from(1), Operator::Eq, &Value::from(1.0)));
        assert!(!execute_compare(&Value::from(1), Operator::Eq, &Value::from("1")));
        assert!(execute_compare(&Value::from(1), Operator::Ne, &Value::from("1")));
        assert!(!execute_compare(&Value::Null, Operator::Eq, &Value::Missing));
        assert!(execute_compare(&Value::Missing, Operator::Eq, &Value::Missing));
    }

    #[test]
    fn test_relational_coercion() {
        assert!(execute_compare(&Value::from("10"), Operator::Gt, &Value::from(9)));
        assert!(execute_compare(&Value::Bool(true), Operator::Ge, &Value::from(1)));
        assert!(!execute_compare(&Value::Null, Operator::Lt, &Value::from(1)));
        assert!(!execute_compare(&Value::from("abc"), Operator::Lt, &Value::from(1)));
        assert!(!execute_compare(&Value::NAN, Operator::Le, &Value::NAN));
    }

    #[test]
    fn test_sort_keys_coerce_numeric_text() {
        assert_eq!(compare_sort_keys(&Value::from("10"), &Value::from("9")), Ordering::Greater);
        assert_eq!(compare_sort_keys(&Value::from("b"), &Value::from("a")), Ordering::Greater);
    }

    #[test]
    fn test_text_keys_collate_ignoring_case_first() {
        assert_eq!(collate_text("a", "B"), Ordering::Less);
        assert_eq!(collate_text("a", "A"), Ordering::Less);
        assert_eq!(collate_text("Zebra", "apple"), Ordering::Greater);
        assert_eq!(collate_text("abc", "abc"), Ordering::Equal);

        let mut words = vec!["b", "B", "a", "A"];
        words.sort_by(|x, y| collate_text(x, y));
        assert_eq!(words, vec!["a", "A", "b", "B"]);
    }

    #[test]
    fn test_sort_key_order() {
        let mut values = vec![
            Value::from(5),
            Value::Missing,
            Value::from(1),
            Value::Null,
            Value::from(8),
        ];
        values.sort_by(compare_sort_keys);
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Missing,
                Value::from(1),
                Value::from(5),
                Value::from(8)
            ]
        );
    }
}
