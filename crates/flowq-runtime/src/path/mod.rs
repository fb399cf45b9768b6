//! Path evaluation
//!
//! Paths are compiled once into [`PathStep`] lists and cached by their raw
//! text, then applied against data. Evaluation never fails: anything that
//! cannot be resolved (including path text that does not compile) yields
//! [`Value::Missing`].

mod cache;
mod lookup;

pub use cache::PathCache;
pub(crate) use lookup::slice_range;

use flowq_core::ast::PathStep;
use flowq_core::Value;
use flowq_parser::{PathParser, Result};
use std::sync::Arc;

/// A compiled path, ready to run against any data
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    source: String,
    steps: Vec<PathStep>,
}

impl CompiledPath {
    /// Compile path text
    pub fn compile(path: &str) -> Result<Self> {
        Ok(Self {
            source: path.trim().to_string(),
            steps: PathParser::compile(path)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Apply the steps to `root`
    pub fn extract(&self, root: &Value) -> Value {
        lookup::extract(&self.steps, root)
    }
}

/// Path evaluator with an optional compiled-path cache
#[derive(Debug, Default)]
pub struct PathEvaluator {
    cache: Option<PathCache>,
}

impl PathEvaluator {
    /// Create an evaluator that caches compiled paths
    pub fn new() -> Self {
        Self {
            cache: Some(PathCache::new()),
        }
    }

    /// Create an evaluator that compiles on every call
    pub fn without_cache() -> Self {
        Self { cache: None }
    }

    /// Compile `path`, reusing the cached compilation when present
    pub fn compile(&self, path: &str) -> Result<Arc<CompiledPath>> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(CompiledPath::compile(path)?));
        };

        if let Some(compiled) = cache.get(path) {
            return Ok(compiled);
        }

        let compiled = Arc::new(CompiledPath::compile(path)?);
        cache.insert(path, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Evaluate `path` against `data`
    pub fn evaluate(&self, path: &str, data: &Value) -> Value {
        match self.compile(path) {
            Ok(compiled) => compiled.extract(data),
            Err(e) => {
                tracing::debug!("Path '{}' did not compile: {}", path, e);
                Value::Missing
            }
        }
    }

    /// Number of cached compilations
    pub fn cached_paths(&self) -> usize {
        self.cache.as_ref().map_or(0, PathCache::len)
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn eval(path: &str, data: serde_json::Value) -> Value {
        PathEvaluator::new().evaluate(path, &Value::from(data))
    }

    #[test]
    fn test_simple_properties() {
        let data = json!({"user": {"profile": {"email": "a@b.c"}}});
        assert_eq!(eval("$.user.profile.email", data.clone()), Value::from("a@b.c"));
        assert_eq!(eval("$.user.missing", data.clone()), Value::Missing);
        assert_eq!(eval("$.user.missing.deeper", data), Value::Missing);
    }

    #[test]
    fn test_root_returns_whole_document() {
        let data = json!({"a": 1});
        assert_eq!(eval("$", data.clone()), Value::from(data));
    }

    #[test]
    fn test_auto_vectorization_after_index() {
        let data = json!({"a": [{"b": [{"id": 2}, {"id": 3}]}]});
        assert_eq!(eval("$.a[0].b[*].id", data), Value::from(json!([2, 3])));
    }

    #[test]
    fn test_auto_vectorization_after_property() {
        let data = json!({"items": [{"name": "x"}, {"other": 1}]});
        assert_eq!(
            eval("$.items.name", data),
            Value::Array(vec![Value::from("x"), Value::Missing])
        );
    }

    #[test]
    fn test_vectorization_is_one_step_only() {
        let data = json!({"a": [{"b": {"c": 1}}]});
        assert_eq!(eval("$.a[*].b.c", data), Value::Missing);
    }

    #[test]
    fn test_explicit_null_is_preserved_until_stepped_into() {
        let data = json!({"a": null});
        assert_eq!(eval("$.a", data.clone()), Value::Null);
        assert_eq!(eval("$.a.b", data), Value::Missing);
    }

    #[test]
    fn test_numeric_index_and_out_of_range() {
        let data = json!({"list": [10, 20, 30]});
        assert_eq!(eval("$.list[1]", data.clone()), Value::from(20));
        assert_eq!(eval("$.list[5]", data.clone()), Value::Missing);
        assert_eq!(eval("$.list['x']", data), Value::Missing);
    }

    #[test]
    fn test_slices() {
        let data = json!({"list": [1, 2, 3, 4, 5]});
        assert_eq!(eval("$.list[1:3]", data.clone()), Value::from(json!([2, 3])));
        assert_eq!(eval("$.list[:2]", data.clone()), Value::from(json!([1, 2])));
        assert_eq!(eval("$.list[-2:]", data.clone()), Value::from(json!([4, 5])));
        assert_eq!(eval("$.list[3:1]", data), Value::from(json!([])));
    }

    #[test]
    fn test_keys_and_wildcards_on_objects() {
        let data = json!({"m": {"first name": "Ann", "2": "two", "x": 1}});
        assert_eq!(eval("$.m['first name']", data.clone()), Value::from("Ann"));
        assert_eq!(eval("$.m[2]", data.clone()), Value::from("two"));
        assert_eq!(eval("$.m[*]", data), Value::from(json!(["Ann", "two", 1])));
    }

    #[test]
    fn test_invalid_path_is_missing() {
        assert_eq!(eval("$.a[0", json!({"a": [1]})), Value::Missing);
    }

    #[test]
    fn test_cache_reuses_compilation() {
        let evaluator = PathEvaluator::new();
        let data = Value::from(json!({"a": 1}));
        evaluator.evaluate("$.a", &data);
        evaluator.evaluate("$.a", &data);
        evaluator.evaluate("$.b", &data);
        assert_eq!(evaluator.cached_paths(), 2);

        let first = evaluator.compile("$.a").unwrap();
        let second = evaluator.compile("$.a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        evaluator.clear_cache();
        assert_eq!(evaluator.cached_paths(), 0);
    }

    #[test]
    fn test_uncached_evaluator() {
        let evaluator = PathEvaluator::without_cache();
        let data = Value::from(json!({"a": 1}));
        assert_eq!(evaluator.evaluate("$.a", &data), Value::from(1));
        assert_eq!(evaluator.cached_paths(), 0);
    }
}
