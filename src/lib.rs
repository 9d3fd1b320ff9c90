//! # Deep Equal
//!
//! Structural comparison of two values that reports every difference as a
//! human-readable `path: a != b` line.
//!
//! Values are described by a small runtime type model, so arbitrary Rust data,
//! JSON and YAML documents, and hand-built values with methods can all be
//! compared. Types may opt into custom equality (`Equal`), error identity
//! (`Error`) and time truncation (`Truncate`).
//!
//! ```
//! use deep_equal::{Comparator, Config};
//!
//! assert_eq!(deep_equal::equal("foo", "bar"), vec!["foo != bar"]);
//!
//! let cmp = Comparator::with_config(Config::default());
//! assert_eq!(cmp.equal(&vec![1i64, 2, 3], &vec![1i64, 2]), vec!["slice[2]: 3 != <no value>"]);
//! ```
//!
//! ## Modules
//!
//! - [`value`] - Runtime type model, values, reflection of Rust data and document decoding
//! - [`config`] - Comparison settings and the process-wide defaults
//! - [`compare`] - The comparison engine and its reporting

pub mod compare;
pub mod config;
pub mod value;

pub use compare::{equal, equal_values, Comparator, DeepError, Diff, PathStack, Segment};
pub use config::{config, reset_config, set_config, update_config, Config};
pub use value::{
    from_json, from_yaml, Kind, Method, Reflect, StructField, StructTag, Type, Value, ValueError,
};
