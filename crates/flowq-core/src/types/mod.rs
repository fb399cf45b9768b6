//! Type system for flowq
//!
//! Runtime values plus the coercion rules shared by operators, sorting and casts.

pub mod value;

pub use value::{format_number, parse_number, Map, Value};
