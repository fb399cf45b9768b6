//! Math functions

use flowq_core::Value;

fn number(value: &Value) -> f64 {
    value.to_number().unwrap_or(f64::NAN)
}

pub(crate) fn abs(value: &Value) -> Value {
    Value::Number(number(value).abs())
}

pub(crate) fn ceil(value: &Value) -> Value {
    Value::Number(number(value).ceil())
}

pub(crate) fn floor(value: &Value) -> Value {
    Value::Number(number(value).floor())
}

pub(crate) fn pow(base: &Value, exponent: &Value) -> Value {
    Value::Number(number(base).powf(number(exponent)))
}

/// Round half up, optionally to `digits` decimal places
pub(crate) fn round(value: &Value, digits: &Value) -> Value {
    let n = number(value);
    let digits = match digits {
        Value::Missing | Value::Null => 0.0,
        other => number(other).trunc(),
    };
    if digits.is_nan() {
        return Value::NAN;
    }
    if digits == 0.0 {
        return Value::Number(round_half_up(n));
    }
    let factor = 10f64.powf(digits);
    Value::Number(round_half_up(n * factor) / factor)
}

fn round_half_up(n: f64) -> f64 {
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Smallest argument; list arguments contribute their elements
pub(crate) fn min(args: &[Value]) -> Value {
    fold(args, f64::INFINITY, f64::min)
}

/// Largest argument; list arguments contribute their elements
pub(crate) fn max(args: &[Value]) -> Value {
    fold(args, f64::NEG_INFINITY, f64::max)
}

fn fold(args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> Value {
    let mut acc = init;
    for value in args.iter().flat_map(|arg| match arg {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    }) {
        let n = number(value);
        if n.is_nan() {
            return Value::NAN;
        }
        acc = pick(acc, n);
    }
    Value::Number(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round() {
        assert_eq!(round(&Value::from(2.5), &Value::Missing), Value::from(3));
        assert_eq!(round(&Value::from(-2.5), &Value::Missing), Value::from(-2));
        assert_eq!(round(&Value::from(3.14159), &Value::from(2)), Value::from(3.14));
        assert_eq!(round(&Value::from("7.6"), &Value::Missing), Value::from(8));
        assert!(round(&Value::from("x"), &Value::Missing).is_nan());
    }

    #[test]
    fn test_abs_ceil_floor_pow() {
        assert_eq!(abs(&Value::from(-3)), Value::from(3));
        assert_eq!(ceil(&Value::from(1.2)), Value::from(2));
        assert_eq!(floor(&Value::from(1.8)), Value::from(1));
        assert_eq!(pow(&Value::from(2), &Value::from(10)), Value::from(1024));
    }

    #[test]
    fn test_min_max() {
        let args = [Value::from(3), Value::from(1), Value::from(2)];
        assert_eq!(min(&args), Value::from(1));
        assert_eq!(max(&args), Value::from(3));

        let list = [Value::Array(vec![Value::from(4), Value::from(9)])];
        assert_eq!(max(&list), Value::from(9));

        assert_eq!(min(&[]), Value::from(f64::INFINITY));
        assert!(max(&[Value::from("x")]).is_nan());
    }
}
