//! Default template resolver backed by a [`TemplateContext`]

use super::{TemplateResolution, TemplateResolver};
use crate::path::PathEvaluator;
use flowq_core::{Map, TemplateContext, Value};

/// Resolves the namespaces of a [`TemplateContext`]:
///
/// | Namespace | Source |
/// |-----------|--------|
/// | `param`   | parameters |
/// | `env`     | environment |
/// | `res`     | stored responses, dotted path (`res:login.body.token`) |
/// | `proc`    | transformed data, dotted path |
/// | `fn`      | helper functions, called without arguments |
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextResolver;

impl ContextResolver {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateResolver for ContextResolver {
    fn resolve(&self, text: &str, context: &TemplateContext) -> TemplateResolution {
        let text = text.trim();
        let (quoted, inner) = match text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Some(inner) => (true, inner),
            None => (false, text),
        };

        let Some(body) = inner
            .strip_prefix("{{")
            .and_then(|rest| rest.strip_suffix("}}"))
        else {
            return TemplateResolution::unresolved();
        };
        let Some((namespace, key)) = body.split_once(':') else {
            return TemplateResolution::unresolved();
        };
        let key = key.trim();

        let value = match namespace.trim() {
            "param" => context.parameters.get(key).cloned(),
            "env" => context.environment.get(key).cloned(),
            "res" => lookup(&context.responses, key),
            "proc" => lookup(&context.transformed_data, key),
            "fn" => context.functions.get(key).map(|function| function(&[])),
            other => {
                tracing::debug!("Unknown template namespace '{}'", other);
                None
            }
        };

        match value {
            Some(value) if !value.is_missing() => {
                if quoted {
                    TemplateResolution::resolved(match value {
                        Value::Null => "null".to_string(),
                        other => other.to_text(),
                    })
                } else {
                    TemplateResolution::resolved(value)
                }
            }
            _ => TemplateResolution::unresolved(),
        }
    }
}

/// `name.rest[0].path` -> entry `name`, then `$.rest[0].path` inside it
fn lookup(entries: &Map, key: &str) -> Option<Value> {
    let split = key.find(['.', '[']).unwrap_or(key.len());
    let (name, rest) = key.split_at(split);
    let entry = entries.get(name)?;
    if rest.is_empty() {
        return Some(entry.clone());
    }
    Some(PathEvaluator::without_cache().evaluate(&format!("${}", rest), entry))
}
