//! Path compiler
//!
//! Turns path text into an ordered list of [`PathStep`]s:
//! - a leading `$` becomes [`PathStep::Root`]
//! - `.` outside brackets ends the current bareword, which becomes a property
//! - `[...]` becomes an index step classified as wildcard (`*`), slice
//!   (`a:b`), numeric index (all digits) or string key (quoted or bare)

use crate::error::{ParseError, Result};
use crate::lexer::strip_quotes;
use flowq_core::ast::{IndexSelector, PathStep};

/// Path compiler
pub struct PathParser;

impl PathParser {
    /// Compile path text into steps
    pub fn compile(path: &str) -> Result<Vec<PathStep>> {
        let path = path.trim();
        let mut steps = Vec::new();
        let mut bareword = String::new();
        let mut bracket: Option<String> = None;
        let mut quote: Option<char> = None;

        for (i, c) in path.char_indices() {
            if let Some(inner) = bracket.as_mut() {
                match (quote, c) {
                    (Some(q), _) if c == q => {
                        quote = None;
                        inner.push(c);
                    }
                    (Some(_), _) => inner.push(c),
                    (None, '\'' | '"') => {
                        quote = Some(c);
                        inner.push(c);
                    }
                    (None, ']') => {
                        steps.push(PathStep::Index(Self::classify_index(inner, path)?));
                        bracket = None;
                    }
                    (None, _) => inner.push(c),
                }
                continue;
            }

            match c {
                '$' if i == 0 => steps.push(PathStep::Root),
                '.' => Self::flush_bareword(&mut bareword, &mut steps),
                '[' => {
                    Self::flush_bareword(&mut bareword, &mut steps);
                    bracket = Some(String::new());
                }
                ']' => return Err(Self::invalid(path, "unmatched ']'")),
                _ => bareword.push(c),
            }
        }

        if bracket.is_some() {
            return Err(Self::invalid(path, "unterminated '['"));
        }
        Self::flush_bareword(&mut bareword, &mut steps);

        log::debug!("Compiled path '{}' into {} steps", path, steps.len());
        Ok(steps)
    }

    fn flush_bareword(bareword: &mut String, steps: &mut Vec<PathStep>) {
        let name = bareword.trim();
        if name == "*" {
            steps.push(PathStep::Index(IndexSelector::Wildcard));
        } else if !name.is_empty() {
            steps.push(PathStep::property(name));
        }
        bareword.clear();
    }

    /// Classify the text between `[` and `]`
    fn classify_index(inner: &str, path: &str) -> Result<IndexSelector> {
        let inner = inner.trim();

        if inner.is_empty() {
            return Err(Self::invalid(path, "empty brackets"));
        }
        if inner == "*" {
            return Ok(IndexSelector::Wildcard);
        }

        let unquoted = strip_quotes(inner);
        if unquoted.len() != inner.len() {
            return Ok(IndexSelector::Key(unquoted.to_string()));
        }

        if let Some((start, end)) = inner.split_once(':') {
            let start = Self::slice_bound(start, path)?.unwrap_or(0);
            let end = Self::slice_bound(end, path)?;
            return Ok(IndexSelector::Slice { start, end });
        }

        if inner.chars().all(|c| c.is_ascii_digit()) {
            return inner
                .parse::<usize>()
                .map(IndexSelector::Numeric)
                .map_err(|_| Self::invalid(path, "index out of range"));
        }

        Ok(IndexSelector::Key(inner.to_string()))
    }

    fn slice_bound(text: &str, path: &str) -> Result<Option<i64>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| Self::invalid(path, &format!("invalid slice bound '{}'", text)))
    }

    fn invalid(path: &str, message: &str) -> ParseError {
        ParseError::InvalidPath {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}
