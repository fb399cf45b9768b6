//! Evaluation context
//!
//! Everything an evaluation needs besides the data itself, borrowed from the
//! owning engine for the duration of one `evaluate` call.

use crate::functions::FunctionRegistry;
use crate::path::PathEvaluator;
use crate::template::TemplateResolver;
use flowq_core::TemplateContext;

/// Borrowed evaluation state
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// Compiled-path cache
    pub paths: &'a PathEvaluator,
    /// Operators and functions
    pub registry: &'a FunctionRegistry,
    /// Template bindings
    pub templates: &'a TemplateContext,
    /// External template resolution
    pub resolver: &'a dyn TemplateResolver,
    /// Log contained failures at warn (true) or debug (false) level
    pub log_failures: bool,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        paths: &'a PathEvaluator,
        registry: &'a FunctionRegistry,
        templates: &'a TemplateContext,
        resolver: &'a dyn TemplateResolver,
    ) -> Self {
        Self {
            paths,
            registry,
            templates,
            resolver,
            log_failures: true,
        }
    }

    pub fn with_log_failures(mut self, enabled: bool) -> Self {
        self.log_failures = enabled;
        self
    }

    /// Report a failure that was converted into a safe default
    pub fn report_failure(&self, what: &str, expression: &str, error: &dyn std::fmt::Display) {
        if self.log_failures {
            tracing::warn!("{} failed for '{}': {}", what, expression, error);
        } else {
            tracing::debug!("{} failed for '{}': {}", what, expression, error);
        }
    }
}
