//! Template context
//!
//! Runtime bindings used to resolve `{{...}}` placeholders: stored responses,
//! transformed data, parameters, environment variables and a table of helper
//! functions. The context is owned by the caller (or the engine) and is only
//! ever read during evaluation.

use crate::error::Result;
use crate::types::{Map, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Helper function callable from a template (e.g. `{{fn:uuid}}`)
pub type TemplateFunction = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Bindings available to template resolution
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext {
    /// Responses of previous steps, keyed by step name
    #[serde(default)]
    pub responses: Map,

    /// Data produced by earlier transformations
    #[serde(default)]
    pub transformed_data: Map,

    /// Run parameters
    #[serde(default)]
    pub parameters: Map,

    /// Environment variables
    #[serde(default)]
    pub environment: Map,

    #[serde(skip)]
    pub functions: IndexMap<String, TemplateFunction>,
}

impl TemplateContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from its JSON form (`{"parameters": {...}, ...}`)
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_environment(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.environment.insert(name.into(), value.into());
        self
    }

    pub fn with_response(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.responses.insert(name.into(), value.into());
        self
    }

    pub fn with_transformed(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.transformed_data.insert(name.into(), value.into());
        self
    }

    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Merge another context into this one, key by key.
    ///
    /// Entries present in `other` replace entries with the same name.
    pub fn merge(&mut self, other: TemplateContext) {
        log::debug!(
            "Merging template context: {} responses, {} transformed, {} parameters, {} environment, {} functions",
            other.responses.len(),
            other.transformed_data.len(),
            other.parameters.len(),
            other.environment.len(),
            other.functions.len()
        );
        self.responses.extend(other.responses);
        self.transformed_data.extend(other.transformed_data);
        self.parameters.extend(other.parameters);
        self.environment.extend(other.environment);
        self.functions.extend(other.functions);
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
            && self.transformed_data.is_empty()
            && self.parameters.is_empty()
            && self.environment.is_empty()
            && self.functions.is_empty()
    }
}

impl fmt::Debug for TemplateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateContext")
            .field("responses", &self.responses)
            .field("transformed_data", &self.transformed_data)
            .field("parameters", &self.parameters)
            .field("environment", &self.environment)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}
