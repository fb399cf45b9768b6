//! Built-in functions callable from expressions

use crate::engine::operators::{self, RegexGuard};
use flowq_core::ast::Operator;
use flowq_core::Value;
use std::fmt;
use std::str::FromStr;

static MISSING: Value = Value::Missing;

fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&MISSING)
}

/// Named built-in function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// A binary operator called by name, e.g. `contains(a, b)`
    Operator(Operator),
    /// True for null, missing, `""`, `[]` and `{}`
    Empty,
    /// Length of a string or list; 0 for anything else
    Length,
    Abs,
    Round,
    Ceil,
    Floor,
    Min,
    Max,
    Pow,
    Int,
    Float,
    String,
    Bool,
}

impl Builtin {
    /// Every named (non-operator) builtin
    pub const NAMED: [Builtin; 13] = [
        Builtin::Empty,
        Builtin::Length,
        Builtin::Abs,
        Builtin::Round,
        Builtin::Ceil,
        Builtin::Floor,
        Builtin::Min,
        Builtin::Max,
        Builtin::Pow,
        Builtin::Int,
        Builtin::Float,
        Builtin::String,
        Builtin::Bool,
    ];

    /// Look up a builtin by name or operator symbol
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Operator(op) => op.symbol(),
            Builtin::Empty => "empty",
            Builtin::Length => "length",
            Builtin::Abs => "abs",
            Builtin::Round => "round",
            Builtin::Ceil => "ceil",
            Builtin::Floor => "floor",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Pow => "pow",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::String => "string",
            Builtin::Bool => "bool",
        }
    }

    /// Type casts: `int`, `float`, `string`, `bool`
    pub fn is_cast(&self) -> bool {
        matches!(self, Builtin::Int | Builtin::Float | Builtin::String | Builtin::Bool)
    }

    /// Call with evaluated arguments. Absent trailing arguments read as missing.
    pub(crate) fn call(&self, args: &[Value], regex: &RegexGuard) -> Value {
        let first = arg(args, 0);
        let second = arg(args, 1);

        match self {
            Builtin::Operator(op) => operators::execute_binary_op(first, *op, second, regex),
            Builtin::Empty => Value::Bool(is_empty(first)),
            Builtin::Length => Value::from(length(first) as f64),
            Builtin::Abs => operators::abs(first),
            Builtin::Round => operators::round(first, second),
            Builtin::Ceil => operators::ceil(first),
            Builtin::Floor => operators::floor(first),
            Builtin::Min => operators::min(args),
            Builtin::Max => operators::max(args),
            Builtin::Pow => operators::pow(first, second),
            Builtin::Int => operators::to_int(first, second),
            Builtin::Float => operators::to_float(first, second),
            Builtin::String => operators::to_string(first, second),
            Builtin::Bool => operators::to_bool(first, second),
        }
    }
}

impl FromStr for Builtin {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if let Some(op) = Operator::from_symbol(name) {
            return Ok(Builtin::Operator(op));
        }
        Builtin::NAMED
            .iter()
            .find(|builtin| builtin.name() == name)
            .copied()
            .ok_or(())
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null | Value::Missing => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn length(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        _ => 0,
    }
}
