//! Template resolution
//!
//! A template is a `{{namespace:key}}` placeholder found inside an
//! expression. Resolution is delegated to a [`TemplateResolver`]; when it
//! reports failure the evaluator keeps the raw template text.

mod resolver;

pub use resolver::ContextResolver;

use flowq_core::{TemplateContext, Value};

/// Outcome of resolving one template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateResolution {
    pub success: bool,
    pub value: Value,
}

impl TemplateResolution {
    pub fn resolved(value: impl Into<Value>) -> Self {
        Self {
            success: true,
            value: value.into(),
        }
    }

    pub fn unresolved() -> Self {
        Self {
            success: false,
            value: Value::Missing,
        }
    }
}

/// Resolves template text such as `"{{param:id}}"` or `{{res:login.token}}`.
///
/// A template wrapped in double quotes resolves to the string form of its
/// value; a bare template keeps the value's type.
pub trait TemplateResolver: Send + Sync {
    fn resolve(&self, text: &str, context: &TemplateContext) -> TemplateResolution;
}

impl<F> TemplateResolver for F
where
    F: Fn(&str, &TemplateContext) -> TemplateResolution + Send + Sync,
{
    fn resolve(&self, text: &str, context: &TemplateContext) -> TemplateResolution {
        self(text, context)
    }
}
