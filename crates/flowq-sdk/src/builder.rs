//! Builder pattern for QueryEngine

use crate::config::EngineConfig;
use crate::engine::QueryEngine;
use crate::error::Result;
use flowq_core::TemplateContext;
use flowq_runtime::{ContextResolver, TemplateResolver};
use std::sync::Arc;

/// Builder for QueryEngine
///
/// # Example
///
/// ```rust,ignore
/// use flowq_sdk::{QueryEngineBuilder, TemplateContext};
///
/// let engine = QueryEngineBuilder::new()
///     .enable_path_cache(true)
///     .with_template_context(TemplateContext::new().with_parameter("limit", 10))
///     .build()?;
/// ```
pub struct QueryEngineBuilder {
    config: EngineConfig,
    templates: TemplateContext,
    resolver: Option<Arc<dyn TemplateResolver>>,
}

impl QueryEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            templates: TemplateContext::new(),
            resolver: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable path caching
    pub fn enable_path_cache(mut self, enable: bool) -> Self {
        self.config.enable_path_cache = enable;
        self
    }

    /// Set the regex size budget
    pub fn regex_size_limit(mut self, limit: usize) -> Self {
        self.config.regex_size_limit = limit;
        self
    }

    /// Log contained failures at warn level
    pub fn log_failures(mut self, enable: bool) -> Self {
        self.config.log_failures = enable;
        self
    }

    /// Set the initial template bindings
    pub fn with_template_context(mut self, templates: TemplateContext) -> Self {
        self.templates = templates;
        self
    }

    /// Use a custom template resolver instead of [`ContextResolver`]
    pub fn with_resolver(mut self, resolver: Arc<dyn TemplateResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<QueryEngine> {
        self.config.validate()?;
        let resolver: Arc<dyn TemplateResolver> = match self.resolver {
            Some(resolver) => resolver,
            None => Arc::new(ContextResolver),
        };
        Ok(QueryEngine::from_parts(self.config, self.templates, resolver))
    }
}

impl Default for QueryEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
