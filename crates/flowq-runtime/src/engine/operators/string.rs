//! String predicates
//!
//! Both operands are converted to text first, so `contains(123, 2)` is true
//! and absent values behave like the empty string.

use flowq_core::Value;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Default compiled-size budget for user patterns (1 MiB)
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Pattern shapes refused before compilation
const DENIED_SHAPES: [&str; 3] = [
    // lookahead
    r"\(\?=",
    // stacked quantifiers such as `a**` or `a+*`
    r"(?:^|[^\\])[*+]\s*[*+]",
    // repetition with a missing lower bound, `{,n}`
    r"\{\s*,\s*\d*\s*\}",
];

fn denied_shapes() -> &'static [Regex] {
    static DENIED: OnceLock<Vec<Regex>> = OnceLock::new();
    DENIED.get_or_init(|| {
        DENIED_SHAPES
            .iter()
            .filter_map(|shape| Regex::new(shape).ok())
            .collect()
    })
}

/// Compilation policy for `matches`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegexGuard {
    pub size_limit: usize,
}

impl Default for RegexGuard {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl RegexGuard {
    pub fn new(size_limit: usize) -> Self {
        Self { size_limit }
    }

    /// Compile a user pattern, or `None` when it is refused or invalid
    pub fn compile(&self, pattern: &str) -> Option<Regex> {
        let shape = without_classes(pattern);
        if denied_shapes().iter().any(|denied| denied.is_match(&shape)) {
            tracing::warn!("Refusing regex pattern '{}'", pattern);
            return None;
        }

        match RegexBuilder::new(pattern).size_limit(self.size_limit).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Invalid regex pattern '{}': {}", pattern, e);
                None
            }
        }
    }
}

pub(crate) fn contains(haystack: &Value, needle: &Value) -> bool {
    haystack.to_text().contains(&needle.to_text())
}

pub(crate) fn starts_with(text: &Value, prefix: &Value) -> bool {
    text.to_text().starts_with(&prefix.to_text())
}

pub(crate) fn ends_with(text: &Value, suffix: &Value) -> bool {
    text.to_text().ends_with(&suffix.to_text())
}

/// Regex test; refused or invalid patterns never match
pub(crate) fn matches(
    text: &Value,
    pattern: &Value,
    guard: &RegexGuard,
) -> bool {
    guard
        .compile(&pattern.to_text())
        .is_some_and(|regex| regex.is_match(&text.to_text()))
}

/// Replace every `[...]` character class with a single `x`, leaving the
/// rest of the pattern as written. Class members are literals, so `[*+]+`
/// must not read as stacked quantifiers.
fn without_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut depth = 0usize;

    while let Some(c) = chars.next() {
        if c == '\\' {
            let escaped = chars.next();
            if depth == 0 {
                out.push(c);
                out.extend(escaped);
            }
            continue;
        }
        match c {
            '[' => {
                if depth == 0 {
                    out.push('x');
                }
                depth += 1;
                // `]` right after `[` or `[^` is a member, not the end
                if chars.peek() == Some(&'^') {
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    chars.next();
                }
            }
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
