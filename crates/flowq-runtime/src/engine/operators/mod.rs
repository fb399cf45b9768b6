//! Operator execution modules
//!
//! Implementations behind the infix operators and the named built-in
//! functions. None of them fail: unusable operands produce NaN, `false`,
//! `null` or a caller-supplied default.

mod binary;
mod cast;
mod comparison;
mod math;
mod string;
mod unary;

pub(crate) use binary::{arithmetic, execute_binary_op};
pub(crate) use cast::{to_bool, to_float, to_int, to_string};
pub(crate) use comparison::{compare_sort_keys, execute_compare};
pub(crate) use math::{abs, ceil, floor, max, min, pow, round};
pub(crate) use string::{contains, ends_with, matches, starts_with};
pub use string::{RegexGuard, DEFAULT_REGEX_SIZE_LIMIT};
pub(crate) use unary::execute_unary_op;
