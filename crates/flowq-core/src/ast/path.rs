//! Path steps
//!
//! A structural path such as `$.data[0].items[*].id` compiles into an ordered
//! list of steps that are applied left to right against a running value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a compiled path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathStep {
    /// `$`: the root value
    Root,
    /// `.name`: object property
    Property(String),
    /// `[...]`: bracketed selector
    Index(IndexSelector),
}

/// Bracket selector kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexSelector {
    /// `[3]`
    Numeric(usize),
    /// `['key']`, `["key"]` or `[key]`
    Key(String),
    /// `[*]`
    Wildcard,
    /// `[start:end]`; a missing start is 0 and a missing end is unbounded.
    /// Negative bounds count from the end of the list.
    Slice { start: i64, end: Option<i64> },
}

impl PathStep {
    pub fn property(name: impl Into<String>) -> Self {
        PathStep::Property(name.into())
    }

    pub fn key(name: impl Into<String>) -> Self {
        PathStep::Index(IndexSelector::Key(name.into()))
    }

    pub fn is_property(&self) -> bool {
        matches!(self, PathStep::Property(_))
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Root => f.write_str("$"),
            PathStep::Property(name) => write!(f, ".{}", name),
            PathStep::Index(IndexSelector::Numeric(i)) => write!(f, "[{}]", i),
            PathStep::Index(IndexSelector::Key(key)) => write!(f, "['{}']", key),
            PathStep::Index(IndexSelector::Wildcard) => f.write_str("[*]"),
            PathStep::Index(IndexSelector::Slice { start, end }) => match end {
                Some(end) => write!(f, "[{}:{}]", start, end),
                None => write!(f, "[{}:]", start),
            },
        }
    }
}
