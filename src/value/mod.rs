//! Value module - Reflective representation of runtime values.
//!
//! This module provides runtime types with method tables, values that carry
//! their type, and the host's default rendering of both.

mod decode;
mod error;
mod reflect;
mod render;
mod time;
mod types;
mod value;

pub use decode::*;
pub use error::*;
pub use reflect::*;
pub use render::format_float;
pub use self::time::{format_duration, format_timestamp, truncate_duration, truncate_timestamp};
pub use types::*;
pub use value::*;
