//! QueryEngine - main entry point
//!
//! Owns the compiled-path cache, the function registry and the template
//! bindings. The path cache uses interior mutability without locking, so an
//! engine can move between threads but is not shared across them.

use crate::builder::QueryEngineBuilder;
use crate::config::EngineConfig;
use crate::error::Result;
use flowq_core::{TemplateContext, Value};
use flowq_runtime::{
    ContextResolver, EvalContext, FunctionRegistry, PathEvaluator, TemplateResolver,
};
use std::sync::Arc;

/// Expression and pipeline evaluator
pub struct QueryEngine {
    config: EngineConfig,
    paths: PathEvaluator,
    registry: FunctionRegistry,
    templates: TemplateContext,
    resolver: Arc<dyn TemplateResolver>,
}

impl QueryEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::from_parts(
            EngineConfig::default(),
            TemplateContext::default(),
            Arc::new(ContextResolver),
        )
    }

    /// Start a builder
    pub fn builder() -> QueryEngineBuilder {
        QueryEngineBuilder::new()
    }

    /// Create an engine with a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        QueryEngineBuilder::new().with_config(config).build()
    }

    pub(crate) fn from_parts(
        config: EngineConfig,
        templates: TemplateContext,
        resolver: Arc<dyn TemplateResolver>,
    ) -> Self {
        let paths = if config.enable_path_cache {
            PathEvaluator::new()
        } else {
            PathEvaluator::without_cache()
        };
        let registry = FunctionRegistry::new(
            flowq_runtime::evaluate_prepared,
            flowq_runtime::evaluate_prepared_condition,
        )
        .with_regex_size_limit(config.regex_size_limit);

        tracing::debug!(
            "QueryEngine created (path cache: {}, regex size limit: {})",
            config.enable_path_cache,
            config.regex_size_limit
        );

        Self {
            config,
            paths,
            registry,
            templates,
            resolver,
        }
    }

    fn context(&self) -> EvalContext<'_> {
        EvalContext::new(&self.paths, &self.registry, &self.templates, self.resolver.as_ref())
            .with_log_failures(self.config.log_failures)
    }

    /// Evaluate an expression or pipeline. Never fails: problems produce
    /// `null`, missing, NaN or `[]` as documented per operation.
    pub fn evaluate(&self, expression: &str, data: &Value) -> Value {
        flowq_runtime::evaluate_with_context(expression, data, &self.context())
    }

    /// [`QueryEngine::evaluate`] over `serde_json` values
    pub fn evaluate_json(&self, expression: &str, data: &serde_json::Value) -> serde_json::Value {
        self.evaluate(expression, &Value::from(data)).to_json()
    }

    /// Evaluate and reduce the result to its truthiness
    pub fn evaluate_condition(&self, expression: &str, data: &Value) -> bool {
        flowq_runtime::evaluate_condition(expression, data, &self.context())
    }

    /// Evaluate, surfacing parse errors and unknown functions of a plain
    /// expression instead of replacing them with `null`
    pub fn try_evaluate(&self, expression: &str, data: &Value) -> Result<Value> {
        Ok(flowq_runtime::try_evaluate(expression, data, &self.context())?)
    }

    /// Replace the template bindings
    pub fn set_template_context(&mut self, templates: TemplateContext) {
        self.templates = templates;
    }

    /// Merge bindings into the current template context
    pub fn merge_template_context(&mut self, templates: TemplateContext) {
        self.templates.merge(templates);
    }

    pub fn template_context(&self) -> &TemplateContext {
        &self.templates
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of compiled paths currently cached
    pub fn cached_paths(&self) -> usize {
        self.paths.cached_paths()
    }

    pub fn clear_path_cache(&self) {
        self.paths.clear_cache();
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
