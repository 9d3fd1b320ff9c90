//! Errors raised while building or re-typing values.

use thiserror::Error;

/// ValueError reports misuse of the value construction API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("cannot convert {from} to {to}")]
    Conversion { from: String, to: String },

    #[error("{ty} is not a pointer")]
    NotPointer { ty: String },

    #[error("cannot store through nil {ty}")]
    NilPointer { ty: String },

    #[error("fields of {ty} are already defined")]
    FieldsDefined { ty: String },
}

impl ValueError {
    /// Creates a conversion error.
    pub fn conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        ValueError::Conversion {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_error_display() {
        let err = ValueError::conversion("string", "deep.T1");
        assert_eq!(err.to_string(), "cannot convert string to deep.T1");

        let err = ValueError::NilPointer { ty: "*deep.T".into() };
        assert!(err.to_string().contains("nil *deep.T"));
    }
}
