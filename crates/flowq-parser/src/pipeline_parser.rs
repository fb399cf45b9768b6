//! Pipeline parser
//!
//! A pipeline is a `|`-separated list of stages:
//!
//! ```text
//! $.data | where($.active == true) | map({id: $.id, name: $.name}) | sort({by: $.id, desc: true})
//! ```
//!
//! Splitting only happens on a lone `|` at nesting depth zero; `||` is never
//! split and separators inside quotes, parentheses, brackets or `{{...}}`
//! templates are ignored. Stage argument text is returned raw: each pipeline
//! function decides how its arguments are read.

use crate::error::{ParseError, Result};
use crate::lexer::{is_path_token, strip_quotes};

/// One `name(args)` stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCall {
    pub name: String,
    /// Raw text between the parentheses, trimmed
    pub args: String,
}

/// Arguments of a `sort` stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    /// Path expression extracting the sort key (defaults to the element itself)
    pub by: Option<String>,
    pub desc: bool,
}

/// Pipeline parser
pub struct PipelineParser;

impl PipelineParser {
    /// True when the expression contains a top-level lone `|`
    pub fn is_pipeline(expression: &str) -> bool {
        split_top_level(expression, b'|').len() > 1
    }

    /// Split a pipeline into trimmed stage texts
    pub fn split_stages(expression: &str) -> Vec<String> {
        split_top_level(expression, b'|')
            .into_iter()
            .map(|stage| stage.trim().to_string())
            .collect()
    }

    /// True when the expression is a single path with no operators around it
    pub fn is_pure_path(expression: &str) -> bool {
        let expression = expression.trim();
        expression.starts_with('$') && is_path_token(expression)
    }

    /// Parse `name(args)` (or a bare `name`)
    pub fn parse_stage(stage: &str) -> Result<StageCall> {
        let stage = stage.trim();

        let (name, args) = match stage.find('(') {
            Some(open) => {
                if !stage.ends_with(')') {
                    return Err(ParseError::InvalidStage(stage.to_string()));
                }
                (stage[..open].trim(), stage[open + 1..stage.len() - 1].trim())
            }
            None => (stage, ""),
        };

        let is_identifier = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_alphanumeric() || c == '_');
        if !is_identifier || !balanced(args) {
            return Err(ParseError::InvalidStage(stage.to_string()));
        }

        Ok(StageCall {
            name: name.to_string(),
            args: args.to_string(),
        })
    }

    /// Split an argument list on top-level commas, dropping empty pieces
    pub fn split_arguments(args: &str) -> Vec<String> {
        split_top_level(args, b',')
            .into_iter()
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Parse a `{key: expr, ...}` argument.
    ///
    /// Returns `Ok(None)` when the text is not brace-wrapped. Keys may be
    /// quoted; values are kept as raw expression text.
    pub fn parse_field_map(args: &str) -> Result<Option<Vec<(String, String)>>> {
        let args = args.trim();
        if !(args.starts_with('{') && args.ends_with('}')) || args.starts_with("{{") {
            return Ok(None);
        }

        let inner = &args[1..args.len() - 1];
        let mut fields = Vec::new();
        for entry in Self::split_arguments(inner) {
            let Some(colon) = find_top_level(&entry, b':') else {
                return Err(ParseError::InvalidStage(format!(
                    "expected 'key: expression', got '{}'",
                    entry
                )));
            };
            let key = strip_quotes(entry[..colon].trim()).to_string();
            let value = entry[colon + 1..].trim().to_string();
            if key.is_empty() || value.is_empty() {
                return Err(ParseError::InvalidStage(format!(
                    "expected 'key: expression', got '{}'",
                    entry
                )));
            }
            fields.push((key, value));
        }
        Ok(Some(fields))
    }

    /// Parse a key list: `'a', 'b'`, `['a', 'b']` or `a, b`
    pub fn parse_key_list(args: &str) -> Vec<String> {
        let args = args.trim();
        let inner = args
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(args);
        Self::split_arguments(inner)
            .iter()
            .map(|key| strip_quotes(key).to_string())
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// Parse `sort` arguments: `{by: $.age, desc: true}`, `$.age`, or `$.age, desc`
    pub fn parse_sort_spec(args: &str) -> Result<SortSpec> {
        let mut spec = SortSpec::default();

        if let Some(fields) = Self::parse_field_map(args)? {
            for (key, value) in fields {
                match key.as_str() {
                    "by" => spec.by = Some(strip_quotes(&value).to_string()),
                    "desc" => spec.desc = is_true_flag(&value),
                    other => log::debug!("Ignoring unknown sort option '{}'", other),
                }
            }
            return Ok(spec);
        }

        let mut parts = Self::split_arguments(args).into_iter();
        if let Some(by) = parts.next() {
            spec.by = Some(strip_quotes(&by).to_string());
        }
        if let Some(flag) = parts.next() {
            spec.desc = is_true_flag(&flag) || strip_quotes(&flag).eq_ignore_ascii_case("desc");
        }
        Ok(spec)
    }
}

fn is_true_flag(text: &str) -> bool {
    matches!(strip_quotes(text.trim()).to_ascii_lowercase().as_str(), "true" | "1")
}

/// Scan `text` and report every byte offset of `separator` at depth zero,
/// outside quotes. `||` is skipped as a unit.
fn top_level_offsets(text: &str, separator: u8) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut offsets = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b'|' if separator == b'|' && bytes.get(i + 1) == Some(&b'|') => {
                i += 2;
                continue;
            }
            _ if b == separator && depth <= 0 => offsets.push(i),
            _ => {}
        }
        i += 1;
    }

    offsets
}

fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for offset in top_level_offsets(text, separator) {
        parts.push(&text[start..offset]);
        start = offset + 1;
    }
    parts.push(&text[start..]);
    parts
}

fn find_top_level(text: &str, separator: u8) -> Option<usize> {
    top_level_offsets(text, separator).into_iter().next()
}

fn balanced(text: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in text.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && quote.is_none()
}
