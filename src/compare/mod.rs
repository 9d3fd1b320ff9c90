//! Compare module - Recursive structural comparison.
//!
//! [`equal`] walks two values in lockstep and reports every place they
//! disagree as `path: a != b`. Placeholders such as [`NIL_POINTER`] stand in
//! for absent values and are stable output.

mod comparator;
mod engine;
mod errors;
mod keyed;
mod path;
mod probes;
mod scalars;
mod sink;
mod visited;
mod walkers;


pub use comparator::*;
pub use engine::{DiagnosticSink, SequenceKeys};
pub use errors::*;
pub use path::*;
pub use sink::*;
pub use visited::*;

use crate::value::{Reflect, Value};

pub const UNTYPED_NIL: &str = "<untyped nil>";
pub const INVALID_VALUE: &str = "<invalid value>";
pub const NIL_POINTER: &str = "<nil pointer>";
pub const NIL_MAP: &str = "<nil map>";
pub const NIL_SLICE: &str = "<nil slice>";
pub const NO_VALUE: &str = "<no value>";
pub const DOES_NOT_HAVE_KEY: &str = "<does not have key>";
pub const NON_NIL_FUNC: &str = "<non-nil func>";
pub const NIL_FUNC: &str = "<nil func>";

/// Compares `a` and `b` under the process-wide config and returns their
/// differences, or an empty list if they are equal.
///
/// ```
/// assert_eq!(deep_equal::equal("foo", "bar"), vec!["foo != bar"]);
/// ```
pub fn equal<A, B>(a: &A, b: &B) -> Vec<String>
where
    A: Reflect + ?Sized,
    B: Reflect + ?Sized,
{
    Comparator::new().equal(a, b)
}

/// Like [`equal`], for values that are already reflected.
pub fn equal_values(a: &Value, b: &Value) -> Vec<String> {
    Comparator::new().equal_values(a, b)
}
