//! Step execution
//!
//! Applies compiled steps to a value. Lookups that cannot be satisfied
//! resolve to `Value::Missing` instead of failing.

use flowq_core::ast::{IndexSelector, PathStep};
use flowq_core::Value;
use std::ops::Range;

/// Run `steps` against `root`.
///
/// When a step yields a list and the following step is a property step,
/// that property is read from every element and both steps are consumed.
pub(super) fn extract(steps: &[PathStep], root: &Value) -> Value {
    let mut current = root.clone();
    let mut i = 0;

    while i < steps.len() {
        if current.is_absent() {
            return Value::Missing;
        }

        current = apply_step(&steps[i], current);

        let vectorized = match (&current, steps.get(i + 1)) {
            (Value::Array(items), Some(PathStep::Property(name))) => Some(Value::Array(
                items.iter().map(|item| property(item, name)).collect(),
            )),
            _ => None,
        };

        match vectorized {
            Some(values) => {
                current = values;
                i += 2;
            }
            None => i += 1,
        }
    }

    current
}

fn apply_step(step: &PathStep, current: Value) -> Value {
    match step {
        PathStep::Root => current,
        PathStep::Property(name) => property(&current, name),
        PathStep::Index(selector) => index(&current, selector),
    }
}

fn property(value: &Value, name: &str) -> Value {
    match value {
        Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Missing),
        _ => {
            tracing::trace!("Property '{}' read on {}, returning Missing", name, value.type_name());
            Value::Missing
        }
    }
}

fn index(value: &Value, selector: &IndexSelector) -> Value {
    match (value, selector) {
        (Value::Array(items), IndexSelector::Numeric(i)) => {
            items.get(*i).cloned().unwrap_or(Value::Missing)
        }
        (Value::Array(items), IndexSelector::Key(key)) => key
            .parse::<usize>()
            .ok()
            .and_then(|i| items.get(i).cloned())
            .unwrap_or(Value::Missing),
        (Value::Array(items), IndexSelector::Wildcard) => Value::Array(items.clone()),
        (Value::Array(items), IndexSelector::Slice { start, end }) => {
            Value::Array(items[slice_range(items.len(), *start, *end)].to_vec())
        }
        (Value::Object(map), IndexSelector::Key(key)) => {
            map.get(key).cloned().unwrap_or(Value::Missing)
        }
        (Value::Object(map), IndexSelector::Numeric(i)) => {
            map.get(&i.to_string()).cloned().unwrap_or(Value::Missing)
        }
        (Value::Object(map), IndexSelector::Wildcard) => {
            Value::Array(map.values().cloned().collect())
        }
        _ => Value::Missing,
    }
}

/// Resolve `[start:end]` bounds against a list length.
///
/// Negative bounds count back from the end; an inverted range is empty.
pub(crate) fn slice_range(len: usize, start: i64, end: Option<i64>) -> Range<usize> {
    let resolve = |bound: i64| -> usize {
        if bound < 0 {
            len.saturating_sub(bound.unsigned_abs() as usize)
        } else {
            (bound as usize).min(len)
        }
    };
    let start = resolve(start);
    let end = end.map_or(len, resolve);
    start..end.max(start)
}
