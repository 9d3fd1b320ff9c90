//! Diagnostics raised while comparing.

use crate::value::Kind;
use thiserror::Error;

/// DeepError describes an abnormal condition met during a comparison.
///
/// Diagnostics never abort a comparison: the affected branch is skipped and
/// the error is reported to the diagnostic sinks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeepError {
    #[error("recursed to MaxDepth")]
    MaxRecursion,

    #[error("variables are different types: {a} and {b}")]
    TypeMismatch { a: String, b: String },

    #[error("cannot compare kind {kind}")]
    NotHandled { kind: Kind },

    #[error("slice element {index} cannot be matched by key")]
    UnkeyedElement { index: usize },
}

impl DeepError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(a: impl Into<String>, b: impl Into<String>) -> Self {
        DeepError::TypeMismatch {
            a: a.into(),
            b: b.into(),
        }
    }
}
