//! Expression tokenizer
//!
//! A single regular expression scans the input. Alternation order matters:
//! quote-wrapped templates are tried before plain strings so that
//! `"{{param:id}}"` stays a template, and paths are tried before operators.

use crate::error::{ParseError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Path reference: `$` followed by `.name`, `.*` or `[...]` segments
const PATH_PATTERN: &str = r#"\$(?:\.\*|\.?\w+|\[(?:'[^']*'|"[^"]*"|[^\]'"]*)\])*"#;

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `"{{...}}"`
    QuotedTemplate,
    /// `'{{...}}'`
    SingleQuotedTemplate,
    /// `{{...}}`
    BareTemplate,
    /// `$.a[0].b`
    Path,
    /// `==`, `&&`, `+`, `!`, ...
    Operator,
    /// Bareword
    Identifier,
    /// Quoted string literal (quotes kept in the token text)
    String,
    /// Number literal
    Number,
    LeftParen,
    RightParen,
    Comma,
}

/// A token and its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == symbol
    }
}

fn token_regex() -> Option<&'static Regex> {
    static TOKEN_RE: OnceLock<Option<Regex>> = OnceLock::new();
    TOKEN_RE
        .get_or_init(|| {
            let pattern = format!(
                concat!(
                    r#"(?P<dq_template>"\{{\{{[^}}]*\}}\}}")"#,
                    r#"|(?P<sq_template>'\{{\{{[^}}]*\}}\}}')"#,
                    r#"|(?P<template>\{{\{{[^}}]*\}}\}})"#,
                    r#"|(?P<path>{path})"#,
                    r#"|(?P<operator>==|!=|>=|<=|&&|\|\||[<>+\-*/%!])"#,
                    r#"|(?P<identifier>[A-Za-z_]\w*)"#,
                    r#"|(?P<string>"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*')"#,
                    r#"|(?P<number>\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)"#,
                    r#"|(?P<paren>[()])"#,
                    r#"|(?P<comma>,)"#,
                ),
                path = PATH_PATTERN
            );
            Regex::new(&pattern).ok()
        })
        .as_ref()
}

fn full_path_regex() -> Option<&'static Regex> {
    static PATH_RE: OnceLock<Option<Regex>> = OnceLock::new();
    PATH_RE
        .get_or_init(|| Regex::new(&format!("^{}$", PATH_PATTERN)).ok())
        .as_ref()
}

/// True when the whole text is a single path reference token
pub fn is_path_token(text: &str) -> bool {
    full_path_regex().is_some_and(|re| re.is_match(text))
}

/// Split an expression into tokens.
///
/// Whitespace between tokens is skipped; any other character that no rule
/// accepts is an error.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let Some(token_re) = token_regex() else {
        return Err(ParseError::InvalidExpression("tokenizer unavailable".to_string()));
    };
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for caps in token_re.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        check_gap(input, last_end, whole.start())?;
        last_end = whole.end();

        let kind = if caps.name("dq_template").is_some() {
            TokenKind::QuotedTemplate
        } else if caps.name("sq_template").is_some() {
            TokenKind::SingleQuotedTemplate
        } else if caps.name("template").is_some() {
            TokenKind::BareTemplate
        } else if caps.name("path").is_some() {
            TokenKind::Path
        } else if caps.name("operator").is_some() {
            TokenKind::Operator
        } else if caps.name("identifier").is_some() {
            TokenKind::Identifier
        } else if caps.name("string").is_some() {
            TokenKind::String
        } else if caps.name("number").is_some() {
            TokenKind::Number
        } else if caps.name("comma").is_some() {
            TokenKind::Comma
        } else if whole.as_str() == "(" {
            TokenKind::LeftParen
        } else {
            TokenKind::RightParen
        };

        tokens.push(Token {
            kind,
            text: whole.as_str().to_string(),
            position: whole.start(),
        });
    }
    check_gap(input, last_end, input.len())?;

    log::debug!("Tokenized '{}' into {} tokens", input, tokens.len());
    Ok(tokens)
}

fn check_gap(input: &str, start: usize, end: usize) -> Result<()> {
    match input[start..end].char_indices().find(|(_, c)| !c.is_whitespace()) {
        Some((offset, character)) => Err(ParseError::UnexpectedCharacter {
            character,
            position: start + offset,
        }),
        None => Ok(()),
    }
}

/// Strip the surrounding quotes of a string literal.
///
/// Only an escaped quote (`\'` or `\"`) loses its backslash; every other
/// backslash pair is kept as written (`'^\d+$'` stays `^\d+$`).
pub fn unquote(literal: &str) -> String {
    let inner = strip_quotes(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&quote @ ('\'' | '"')) = chars.peek() {
                out.push(quote);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Remove one pair of matching surrounding quotes, if present
pub fn strip_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &text[1..text.len() - 1];
        }
    }
    text
}
