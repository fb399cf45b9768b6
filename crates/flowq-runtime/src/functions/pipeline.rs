//! Pipeline functions
//!
//! Each function receives the running stage value plus its arguments and
//! returns the next stage value. Functions that expect a list degrade to a
//! fixed result when given anything else (`[]` for `where`/`map`, `0` for
//! `count`/`sum`, missing for `first`/`last`/`at`, the input unchanged for
//! the slicing and ordering functions).

use crate::context::EvalContext;
use crate::engine::operators::{arithmetic, compare_sort_keys};
use crate::engine::PreparedExpression;
use crate::error::{Result, RuntimeError};
use crate::path::slice_range;
use flowq_core::ast::Operator;
use flowq_core::{Map, Value};
use flowq_parser::{PipelineParser, SortSpec};
use std::fmt;
use std::str::FromStr;

/// Pipeline stage function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineFunction {
    /// Keep elements for which the condition is truthy (alias `select`)
    Where,
    /// Evaluate an expression or a `{key: expr}` map per element (alias `transform`)
    Map,
    Sum,
    Avg,
    Count,
    First,
    Last,
    Sort,
    Take,
    Skip,
    At,
    Flatten,
    Pick,
    Unique,
    Reverse,
    Keys,
    Values,
    Join,
    /// Strict arithmetic: both sides must already be numbers
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl PipelineFunction {
    pub const ALL: [PipelineFunction; 23] = [
        PipelineFunction::Where,
        PipelineFunction::Map,
        PipelineFunction::Sum,
        PipelineFunction::Avg,
        PipelineFunction::Count,
        PipelineFunction::First,
        PipelineFunction::Last,
        PipelineFunction::Sort,
        PipelineFunction::Take,
        PipelineFunction::Skip,
        PipelineFunction::At,
        PipelineFunction::Flatten,
        PipelineFunction::Pick,
        PipelineFunction::Unique,
        PipelineFunction::Reverse,
        PipelineFunction::Keys,
        PipelineFunction::Values,
        PipelineFunction::Join,
        PipelineFunction::Add,
        PipelineFunction::Sub,
        PipelineFunction::Mul,
        PipelineFunction::Div,
        PipelineFunction::Mod,
    ];

    /// Look up a pipeline function by name or alias
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            PipelineFunction::Where => "where",
            PipelineFunction::Map => "map",
            PipelineFunction::Sum => "sum",
            PipelineFunction::Avg => "avg",
            PipelineFunction::Count => "count",
            PipelineFunction::First => "first",
            PipelineFunction::Last => "last",
            PipelineFunction::Sort => "sort",
            PipelineFunction::Take => "take",
            PipelineFunction::Skip => "skip",
            PipelineFunction::At => "at",
            PipelineFunction::Flatten => "flatten",
            PipelineFunction::Pick => "pick",
            PipelineFunction::Unique => "unique",
            PipelineFunction::Reverse => "reverse",
            PipelineFunction::Keys => "keys",
            PipelineFunction::Values => "values",
            PipelineFunction::Join => "join",
            PipelineFunction::Add => "add",
            PipelineFunction::Sub => "sub",
            PipelineFunction::Mul => "mul",
            PipelineFunction::Div => "div",
            PipelineFunction::Mod => "mod",
        }
    }

    fn strict_operator(&self) -> Option<Operator> {
        match self {
            PipelineFunction::Add => Some(Operator::Add),
            PipelineFunction::Sub => Some(Operator::Sub),
            PipelineFunction::Mul => Some(Operator::Mul),
            PipelineFunction::Div => Some(Operator::Div),
            PipelineFunction::Mod => Some(Operator::Mod),
            _ => None,
        }
    }

    /// Read stage argument text.
    ///
    /// Conditions, mappings and field paths are prepared once here and
    /// evaluated per element later; numeric and operand arguments are
    /// evaluated now, against the pipeline's outer data.
    pub fn parse_args(&self, text: &str, data: &Value, ctx: &EvalContext<'_>) -> Result<StageArgs> {
        let text = text.trim();

        let args = match self {
            PipelineFunction::Where | PipelineFunction::Map => {
                if *self == PipelineFunction::Map {
                    if let Some(fields) = PipelineParser::parse_field_map(text)? {
                        return Ok(StageArgs::Fields(
                            fields
                                .into_iter()
                                .map(|(key, expr)| (key, PreparedExpression::new(&expr)))
                                .collect(),
                        ));
                    }
                }
                if text.is_empty() {
                    StageArgs::None
                } else {
                    StageArgs::Expression(PreparedExpression::new(text))
                }
            }
            PipelineFunction::Sum | PipelineFunction::Avg | PipelineFunction::Unique => {
                if text.is_empty() {
                    StageArgs::None
                } else {
                    StageArgs::Expression(field_expression(text))
                }
            }
            PipelineFunction::Sort => StageArgs::Sort(PipelineParser::parse_sort_spec(text)?),
            PipelineFunction::Pick => StageArgs::Keys(PipelineParser::parse_key_list(text)),
            PipelineFunction::Count
            | PipelineFunction::First
            | PipelineFunction::Last
            | PipelineFunction::Reverse
            | PipelineFunction::Keys
            | PipelineFunction::Values => StageArgs::None,
            PipelineFunction::Take
            | PipelineFunction::Skip
            | PipelineFunction::At
            | PipelineFunction::Flatten
            | PipelineFunction::Join
            | PipelineFunction::Add
            | PipelineFunction::Sub
            | PipelineFunction::Mul
            | PipelineFunction::Div
            | PipelineFunction::Mod => StageArgs::Values(
                PipelineParser::split_arguments(text)
                    .iter()
                    .map(|arg| ctx.registry.evaluate(&PreparedExpression::new(arg), data, ctx))
                    .collect(),
            ),
        };
        Ok(args)
    }

    /// Build arguments from already evaluated values, for calls such as
    /// `count($.items)` or `where($.items, '$.age > 3')`
    pub fn args_from_values(&self, values: &[Value]) -> StageArgs {
        let text = values.first().and_then(Value::as_str);

        match self {
            PipelineFunction::Where | PipelineFunction::Map => match text {
                Some(expr) => StageArgs::Expression(PreparedExpression::new(expr)),
                None => StageArgs::None,
            },
            PipelineFunction::Sum | PipelineFunction::Avg | PipelineFunction::Unique => {
                match text {
                    Some(field) => StageArgs::Expression(field_expression(field)),
                    None => StageArgs::None,
                }
            }
            PipelineFunction::Sort => StageArgs::Sort(SortSpec {
                by: text.map(str::to_string),
                desc: values.get(1).is_some_and(|flag| {
                    flag.is_truthy() && flag.as_str().map_or(true, |s| s != "asc")
                }),
            }),
            PipelineFunction::Pick => StageArgs::Keys(
                values
                    .iter()
                    .flat_map(|value| match value {
                        Value::Array(items) => items.iter().map(Value::to_text).collect(),
                        other => vec![other.to_text()],
                    })
                    .filter(|key| !key.is_empty())
                    .collect(),
            ),
            _ => StageArgs::Values(values.to_vec()),
        }
    }

    /// Run the function on `input`
    pub fn apply(&self, input: &Value, args: &StageArgs, ctx: &EvalContext<'_>) -> Result<Value> {
        if let Some(op) = self.strict_operator() {
            return Ok(strict_arithmetic(input, op, args.value(0)));
        }

        let value = match self {
            PipelineFunction::Where => match input {
                Value::Array(items) => Value::Array(
                    items
                        .iter()
                        .filter(|item| match args {
                            StageArgs::Expression(condition) => {
                                ctx.registry.condition(condition, item, ctx)
                            }
                            _ => item.is_truthy(),
                        })
                        .cloned()
                        .collect(),
                ),
                _ => Value::Array(vec![]),
            },
            PipelineFunction::Map => match input {
                Value::Array(items) => Value::Array(
                    items.iter().map(|item| map_item(item, args, ctx)).collect(),
                ),
                _ => Value::Array(vec![]),
            },
            PipelineFunction::Sum => match input {
                Value::Array(items) => Value::Number(numbers(items, args, ctx).sum()),
                _ => Value::from(0),
            },
            PipelineFunction::Avg => match input {
                Value::Array(items) if !items.is_empty() => {
                    Value::Number(numbers(items, args, ctx).sum::<f64>() / items.len() as f64)
                }
                _ => Value::Null,
            },
            PipelineFunction::Count => match input {
                Value::Array(items) => Value::from(items.len() as f64),
                _ => Value::from(0),
            },
            PipelineFunction::First => match input {
                Value::Array(items) => items.first().cloned().unwrap_or(Value::Missing),
                _ => Value::Missing,
            },
            PipelineFunction::Last => match input {
                Value::Array(items) => items.last().cloned().unwrap_or(Value::Missing),
                _ => Value::Missing,
            },
            PipelineFunction::Sort => match (input, args) {
                (Value::Array(items), StageArgs::Sort(spec)) => sort(items, spec, ctx),
                (Value::Array(items), _) => sort(items, &SortSpec::default(), ctx),
                _ => input.clone(),
            },
            PipelineFunction::Take => match (input, count_arg(args)) {
                (Value::Array(items), Some(n)) => {
                    Value::Array(items[slice_range(items.len(), 0, Some(n))].to_vec())
                }
                _ => input.clone(),
            },
            PipelineFunction::Skip => match (input, count_arg(args)) {
                (Value::Array(items), Some(n)) => {
                    Value::Array(items[slice_range(items.len(), n, None)].to_vec())
                }
                _ => input.clone(),
            },
            PipelineFunction::At => match (input, count_arg(args)) {
                (Value::Array(items), Some(i)) => {
                    let index = if i < 0 { items.len() as i64 + i } else { i };
                    usize::try_from(index)
                        .ok()
                        .and_then(|index| items.get(index).cloned())
                        .unwrap_or(Value::Missing)
                }
                _ => Value::Missing,
            },
            PipelineFunction::Flatten => match input {
                Value::Array(items) => {
                    let depth = match args.value(0) {
                        Value::Missing => 1,
                        other => other.to_number().map_or(1, |n| n.max(0.0) as usize),
                    };
                    Value::Array(flatten(items, depth))
                }
                _ => input.clone(),
            },
            PipelineFunction::Pick => {
                let StageArgs::Keys(keys) = args else {
                    return Err(self.invalid("expected a list of keys"));
                };
                if keys.is_empty() {
                    return Err(self.invalid("expected at least one key"));
                }
                match input {
                    Value::Array(items) => {
                        Value::Array(items.iter().map(|item| pick(item, keys)).collect())
                    }
                    other => pick(other, keys),
                }
            }
            PipelineFunction::Unique => match input {
                Value::Array(items) => unique(items, args, ctx),
                _ => input.clone(),
            },
            PipelineFunction::Reverse => match input {
                Value::Array(items) => Value::Array(items.iter().rev().cloned().collect()),
                _ => input.clone(),
            },
            PipelineFunction::Keys => match input {
                Value::Object(map) => Value::Array(map.keys().cloned().map(Value::String).collect()),
                _ => Value::Array(vec![]),
            },
            PipelineFunction::Values => match input {
                Value::Object(map) => Value::Array(map.values().cloned().collect()),
                _ => Value::Array(vec![]),
            },
            PipelineFunction::Join => {
                let separator = match args.value(0) {
                    Value::Missing => ",".to_string(),
                    other => other.to_text(),
                };
                match input {
                    Value::Array(items) => Value::String(
                        items
                            .iter()
                            .map(Value::to_text)
                            .collect::<Vec<_>>()
                            .join(&separator),
                    ),
                    other => Value::String(other.to_text()),
                }
            }
            PipelineFunction::Add
            | PipelineFunction::Sub
            | PipelineFunction::Mul
            | PipelineFunction::Div
            | PipelineFunction::Mod => Value::Missing,
        };
        Ok(value)
    }

    fn invalid(&self, message: &str) -> RuntimeError {
        RuntimeError::InvalidArguments {
            function: self.name().to_string(),
            message: message.to_string(),
        }
    }
}

impl FromStr for PipelineFunction {
    type Err = ();

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        match name {
            "select" => Ok(PipelineFunction::Where),
            "transform" => Ok(PipelineFunction::Map),
            _ => PipelineFunction::ALL
                .iter()
                .find(|function| function.name() == name)
                .copied()
                .ok_or(()),
        }
    }
}

impl fmt::Display for PipelineFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments of a pipeline function call
#[derive(Debug, Clone, PartialEq)]
pub enum StageArgs {
    None,
    /// Expression evaluated per element
    Expression(PreparedExpression),
    /// `{key: expr}` projection
    Fields(Vec<(String, PreparedExpression)>),
    Sort(SortSpec),
    /// Key names for `pick`
    Keys(Vec<String>),
    /// Evaluated operands
    Values(Vec<Value>),
}

static MISSING: Value = Value::Missing;

impl StageArgs {
    /// Evaluated operand at `index`, missing when absent
    pub fn value(&self, index: usize) -> &Value {
        match self {
            StageArgs::Values(values) => values.get(index).unwrap_or(&MISSING),
            _ => &MISSING,
        }
    }
}

/// Field names become paths relative to the element: `price` -> `$.price`
fn field_expression(field: &str) -> PreparedExpression {
    PreparedExpression::new(&field_path(field))
}

fn field_path(field: &str) -> String {
    let field = flowq_parser::strip_quotes(field.trim());
    if field.starts_with('$') {
        field.to_string()
    } else {
        format!("$.{}", field)
    }
}

/// Numeric operand of take/skip/at, truncated; `None` passes the input through
fn count_arg(args: &StageArgs) -> Option<i64> {
    args.value(0)
        .to_number()
        .filter(|n| !n.is_nan())
        .map(|n| n.trunc() as i64)
}

fn strict_arithmetic(input: &Value, op: Operator, operand: &Value) -> Value {
    match (input, operand) {
        (Value::Number(l), Value::Number(r)) => Value::Number(arithmetic(*l, op, *r)),
        _ => {
            tracing::debug!(
                "Strict {} on {} and {}, returning Missing",
                op,
                input.type_name(),
                operand.type_name()
            );
            Value::Missing
        }
    }
}

fn map_item(item: &Value, args: &StageArgs, ctx: &EvalContext<'_>) -> Value {
    match args {
        StageArgs::Expression(expr) => ctx.registry.evaluate(expr, item, ctx),
        StageArgs::Fields(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, expr)| (key.clone(), ctx.registry.evaluate(expr, item, ctx)))
                .collect::<Map>(),
        ),
        _ => item.clone(),
    }
}

/// Element values (or the field at `args`) coerced to numbers; non-numeric count as 0
fn numbers<'a>(
    items: &'a [Value],
    args: &'a StageArgs,
    ctx: &'a EvalContext<'a>,
) -> impl Iterator<Item = f64> + 'a {
    items.iter().map(move |item| {
        let value = match args {
            StageArgs::Expression(field) => ctx.registry.evaluate(field, item, ctx),
            _ => item.clone(),
        };
        value.to_number().filter(|n| !n.is_nan()).unwrap_or(0.0)
    })
}

/// Stable sort by key. Missing elements always go last; among the rest
/// null keys sort before missing keys, which sort before defined keys, and
/// `desc` reverses that whole order.
fn sort(items: &[Value], spec: &SortSpec, ctx: &EvalContext<'_>) -> Value {
    let (present, missing): (Vec<&Value>, Vec<&Value>) =
        items.iter().partition(|item| !item.is_missing());

    let by = spec.by.as_deref().map(field_expression);
    let mut keyed: Vec<(Value, &Value)> = present
        .into_iter()
        .map(|item| {
            let key = match &by {
                Some(by) => ctx.registry.evaluate(by, item, ctx),
                None => item.clone(),
            };
            (key, item)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_sort_keys(a, b);
        if spec.desc {
            ordering.reverse()
        } else {
            ordering
        }
    });

    Value::Array(
        keyed
            .into_iter()
            .map(|(_, item)| item.clone())
            .chain(missing.into_iter().cloned())
            .collect(),
    )
}

fn flatten(items: &[Value], depth: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) if depth > 0 => out.extend(flatten(inner, depth - 1)),
            other => out.push(other.clone()),
        }
    }
    out
}

fn pick(value: &Value, keys: &[String]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            keys.iter()
                .filter_map(|key| map.get(key).map(|v| (key.clone(), v.clone())))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// First occurrence wins; equality is structural on the element or its key
fn unique(items: &[Value], args: &StageArgs, ctx: &EvalContext<'_>) -> Value {
    let mut seen: Vec<Value> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        let key = match args {
            StageArgs::Expression(field) => ctx.registry.evaluate(field, item, ctx),
            _ => item.clone(),
        };
        if !seen.contains(&key) {
            seen.push(key);
            out.push(item.clone());
        }
    }
    Value::Array(out)
}
