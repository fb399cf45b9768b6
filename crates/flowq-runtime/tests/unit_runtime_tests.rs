//! Unit tests for flowq-runtime
//!
//! Exercises the path evaluator, the function registry and the pipeline
//! executor through the public runtime API.

use flowq_core::{TemplateContext, Value};
use flowq_runtime::{
    evaluate_condition, evaluate_with_context, try_evaluate, Builtin, ContextResolver, EvalContext,
    FunctionRegistry, PathEvaluator, PipelineFunction, PreparedExpression, RuntimeError,
    StageArgs, TemplateResolution,
};
use pretty_assertions::assert_eq;
use serde_json::json;

struct Fixture {
    paths: PathEvaluator,
    registry: FunctionRegistry,
    templates: TemplateContext,
}

impl Fixture {
    fn new() -> Self {
        Self {
            paths: PathEvaluator::new(),
            registry: FunctionRegistry::default(),
            templates: TemplateContext::new(),
        }
    }

    fn ctx(&self) -> EvalContext<'_> {
        EvalContext::new(&self.paths, &self.registry, &self.templates, &ContextResolver)
    }

    fn eval(&self, expression: &str, data: serde_json::Value) -> Value {
        evaluate_with_context(expression, &Value::from(data), &self.ctx())
    }
}

// ========== Path Evaluator Tests ==========

#[test]
fn test_path_cache_is_shared_across_evaluations() {
    let fixture = Fixture::new();
    let data = json!({"users": [{"name": "a"}, {"name": "b"}]});

    for _ in 0..3 {
        assert_eq!(fixture.eval("$.users.name", data.clone()), Value::from(json!(["a", "b"])));
    }
    assert_eq!(fixture.paths.cached_paths(), 1);
}

#[test]
fn test_paths_inside_pipelines_are_cached() {
    let fixture = Fixture::new();
    fixture.eval("$.items | where($.active == true) | map($.id)", json!({"items": []}));
    assert!(fixture.paths.cached_paths() >= 1);
}

// ========== Registry Tests ==========

#[test]
fn test_registry_lookup() {
    let registry = FunctionRegistry::default();
    for name in ["contains", "matches", "round", "int", "where", "select", "transform", "flatten"] {
        assert!(registry.has_function(name), "{} should be registered", name);
    }
    assert!(!registry.has_function("explode"));
    assert!(registry.function_names().contains(&"startsWith"));
}

#[test]
fn test_registry_uses_injected_callbacks() {
    fn always_one(_: &PreparedExpression, _: &Value, _: &EvalContext<'_>) -> Value {
        Value::from(1)
    }
    fn always_true(_: &PreparedExpression, _: &Value, _: &EvalContext<'_>) -> bool {
        true
    }

    let paths = PathEvaluator::new();
    let registry = FunctionRegistry::new(always_one, always_true);
    let templates = TemplateContext::new();
    let ctx = EvalContext::new(&paths, &registry, &templates, &ContextResolver);

    let input = Value::from(json!([{"a": 1}, {"a": 2}]));
    let mapped = registry
        .apply_stage(
            PipelineFunction::Map,
            &input,
            &StageArgs::Expression(PreparedExpression::new("$.a")),
            &ctx,
        )
        .unwrap();
    assert_eq!(mapped, Value::from(json!([1, 1])));

    let filtered = registry
        .apply_stage(
            PipelineFunction::Where,
            &input,
            &StageArgs::Expression(PreparedExpression::new("false")),
            &ctx,
        )
        .unwrap();
    assert_eq!(filtered, input);
}

#[test]
fn test_stage_expression_is_parsed_once_and_reused_per_element() {
    fn parsed_source(expression: &PreparedExpression, _: &Value, _: &EvalContext<'_>) -> Value {
        match expression {
            PreparedExpression::Parsed { source, .. } => Value::from(source.as_str()),
            _ => Value::Null,
        }
    }
    fn never(_: &PreparedExpression, _: &Value, _: &EvalContext<'_>) -> bool {
        false
    }

    let paths = PathEvaluator::new();
    let registry = FunctionRegistry::new(parsed_source, never);
    let templates = TemplateContext::new();
    let ctx = EvalContext::new(&paths, &registry, &templates, &ContextResolver);

    let args = PipelineFunction::Map.parse_args(" $.a * 10 ", &Value::Null, &ctx).unwrap();
    let input = Value::from(json!([{"a": 1}, {"a": 2}]));
    let mapped = registry.apply_stage(PipelineFunction::Map, &input, &args, &ctx).unwrap();
    assert_eq!(mapped, Value::from(json!(["$.a * 10", "$.a * 10"])));

    let fixture = Fixture::new();
    let ctx = fixture.ctx();
    let args = PipelineFunction::Map.parse_args("$.a * 10", &Value::Null, &ctx).unwrap();
    let mapped = fixture
        .registry
        .apply_stage(PipelineFunction::Map, &input, &args, &ctx)
        .unwrap();
    assert_eq!(mapped, Value::from(json!([10, 20])));

    let args = PipelineFunction::Where.parse_args("$.a >", &Value::Null, &ctx).unwrap();
    let filtered = fixture
        .registry
        .apply_stage(PipelineFunction::Where, &input, &args, &ctx)
        .unwrap();
    assert_eq!(filtered, Value::from(json!([])));
}

#[test]
fn test_unknown_function_call() {
    let fixture = Fixture::new();
    let result = fixture.registry.call("explode", &[], &fixture.ctx());
    assert_eq!(result, Err(RuntimeError::UnknownFunction("explode".to_string())));
}

#[test]
fn test_builtin_table() {
    assert_eq!(Builtin::from_name("floor"), Some(Builtin::Floor));
    assert_eq!(Builtin::from_name("where"), None);
    assert_eq!(Builtin::Bool.to_string(), "bool");
}

// ========== Pipeline Executor Tests ==========

#[test]
fn test_filter_map_pipeline() {
    let fixture = Fixture::new();
    let data = json!({
        "data": [
            {"id": "t1", "active": true},
            {"id": "t2", "active": true},
            {"id": "t3", "active": false}
        ]
    });
    assert_eq!(
        fixture.eval("$.data | where($.active == true) | map($.id)", data),
        Value::from(json!(["t1", "t2"]))
    );
}

#[test]
fn test_map_with_field_projection() {
    let fixture = Fixture::new();
    let data = json!({"users": [{"id": 1, "first": "Ann", "age": 30}]});
    assert_eq!(
        fixture.eval("$.users | map({id: $.id, name: $.first, adult: $.age >= 18})", data),
        Value::from(json!([{"id": 1, "name": "Ann", "adult": true}]))
    );
}

#[test]
fn test_sum_avg_with_field() {
    let fixture = Fixture::new();
    let data = json!({"orders": [{"total": 10}, {"total": "5"}, {"total": "n/a"}, {}]});
    assert_eq!(fixture.eval("$.orders | sum(total)", data.clone()), Value::from(15));
    assert_eq!(fixture.eval("$.orders | sum('$.total')", data.clone()), Value::from(15));
    assert_eq!(fixture.eval("$.orders | avg(total)", data), Value::from(3.75));
}

#[test]
fn test_pick_and_unique() {
    let fixture = Fixture::new();
    let data = json!({"rows": [
        {"id": 1, "kind": "a", "secret": "x"},
        {"id": 2, "kind": "a", "secret": "y"},
        {"id": 3, "kind": "b", "secret": "z"}
    ]});
    assert_eq!(
        fixture.eval("$.rows | pick('id', 'kind') | unique(kind) | map($.id)", data.clone()),
        Value::from(json!([1, 3]))
    );
    assert_eq!(
        fixture.eval("$.rows[0] | pick(['id'])", data),
        Value::from(json!({"id": 1}))
    );
}

#[test]
fn test_pick_without_keys_fails_the_stage() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.eval("$.rows | pick()", json!({"rows": [{"a": 1}]})),
        Value::from(json!([]))
    );
}

#[test]
fn test_object_functions() {
    let fixture = Fixture::new();
    let data = json!({"m": {"b": 2, "a": 1}});
    assert_eq!(fixture.eval("$.m | keys()", data.clone()), Value::from(json!(["b", "a"])));
    assert_eq!(fixture.eval("$.m | values() | sum()", data.clone()), Value::from(3));
    assert_eq!(fixture.eval("$.m | keys() | join('-')", data), Value::from("b-a"));
}

#[test]
fn test_reverse_and_flatten() {
    let fixture = Fixture::new();
    let data = json!({"xs": [[1, [2]], [3]]});
    assert_eq!(
        fixture.eval("$.xs | flatten() | reverse()", data.clone()),
        Value::from(json!([3, [2], 1]))
    );
    assert_eq!(fixture.eval("$.xs | flatten(2)", data), Value::from(json!([1, 2, 3])));
}

#[test]
fn test_condition_helper() {
    let fixture = Fixture::new();
    let data = Value::from(json!({"age": 21, "name": ""}));
    assert!(evaluate_condition("$.age > 18", &data, &fixture.ctx()));
    assert!(!evaluate_condition("$.name", &data, &fixture.ctx()));
    assert!(!evaluate_condition("$.age >", &data, &fixture.ctx()));
}

#[test]
fn test_try_evaluate_surfaces_errors() {
    let fixture = Fixture::new();
    let data = Value::from(json!({}));
    assert!(try_evaluate("1 +", &data, &fixture.ctx()).is_err());
    assert_eq!(
        try_evaluate("explode(1)", &data, &fixture.ctx()),
        Err(RuntimeError::UnknownFunction("explode".to_string()))
    );
    assert_eq!(try_evaluate("$.a | count()", &data, &fixture.ctx()), Ok(Value::from(0)));
}

// ========== Template Tests ==========

#[test]
fn test_custom_resolver_closure() {
    let paths = PathEvaluator::new();
    let registry = FunctionRegistry::default();
    let templates = TemplateContext::new();
    let resolver = |text: &str, _: &TemplateContext| {
        if text.contains("answer") {
            TemplateResolution::resolved(42)
        } else {
            TemplateResolution::unresolved()
        }
    };
    let ctx = EvalContext::new(&paths, &registry, &templates, &resolver);

    let data = Value::from(json!({}));
    assert_eq!(evaluate_with_context("{{fn:answer}} + 1", &data, &ctx), Value::from(43));
    assert_eq!(
        evaluate_with_context("{{fn:other}}", &data, &ctx),
        Value::from("{{fn:other}}")
    );
}
