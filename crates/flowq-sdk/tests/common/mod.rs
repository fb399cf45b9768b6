//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use flowq_sdk::{QueryEngine, QueryEngineBuilder, TemplateContext, Value};

/// Test helper wrapping a QueryEngine with optional template bindings
pub struct TestEngine {
    templates: TemplateContext,
}

impl TestEngine {
    /// Create a new test engine with no template bindings
    pub fn new() -> Self {
        Self {
            templates: TemplateContext::new(),
        }
    }

    /// Bind a template parameter
    pub fn with_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.templates = self.templates.with_parameter(name, value);
        self
    }

    /// Bind a stored response
    pub fn with_response(mut self, name: &str, value: serde_json::Value) -> Self {
        self.templates = self.templates.with_response(name, value);
        self
    }

    fn engine(&self) -> QueryEngine {
        QueryEngineBuilder::new()
            .with_template_context(self.templates.clone())
            .log_failures(false)
            .build()
            .expect("Failed to build engine")
    }

    /// Evaluate against JSON data
    pub fn eval(&self, expression: &str, data: serde_json::Value) -> Value {
        self.engine().evaluate(expression, &Value::from(data))
    }

    /// Evaluate against JSON data and convert the result back to JSON
    pub fn eval_json(&self, expression: &str, data: serde_json::Value) -> serde_json::Value {
        self.eval(expression, data).to_json()
    }
}

/// Assertion helpers for evaluation results
pub trait ValueAssertions {
    fn assert_json(&self, expected: serde_json::Value);
    fn assert_missing(&self);
    fn assert_nan(&self);
}

impl ValueAssertions for Value {
    fn assert_json(&self, expected: serde_json::Value) {
        assert_eq!(self, &Value::from(expected), "unexpected result");
    }

    fn assert_missing(&self) {
        assert!(self.is_missing(), "expected missing, got {:?}", self);
    }

    fn assert_nan(&self) {
        assert!(self.is_nan(), "expected NaN, got {:?}", self);
    }
}
