//! Configurable entry point of the comparison engine.

use std::rc::Rc;

use super::engine::{Context, Hooks};
use super::errors::DeepError;
use super::sink::Diff;
use crate::config::{self, Config};
use crate::value::{Reflect, Value};

/// Comparator compares values under a fixed [`Config`] and optional hooks.
///
/// ```
/// use deep_equal::{Comparator, Config};
///
/// let cmp = Comparator::with_config(Config { float_precision: 6, ..Config::default() });
/// assert!(cmp.equal(&1.1234561f64, &1.1234562f64).is_empty());
/// ```
#[derive(Clone)]
pub struct Comparator {
    config: Config,
    hooks: Hooks,
}

impl Comparator {
    /// Creates a comparator using a snapshot of the process-wide config.
    pub fn new() -> Self {
        Comparator::with_config(config::config())
    }

    pub fn with_config(config: Config) -> Self {
        Comparator {
            config,
            hooks: Hooks::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Installs a filter called with every candidate diff. Diffs it rejects
    /// are dropped and do not count toward `max_diff`.
    pub fn filter(mut self, filter: impl Fn(&Diff) -> bool + 'static) -> Self {
        self.hooks.filter = Some(Rc::new(filter));
        self
    }

    /// Installs the identity-field lookup for slices. It is called with the
    /// name of the innermost struct field or map key holding the slice, or
    /// `""` at the top level.
    pub fn sequence_keys(mut self, keys: impl Fn(&str) -> Vec<String> + 'static) -> Self {
        self.hooks.sequence_keys = Some(Rc::new(keys));
        self
    }

    /// Installs a sink receiving every diagnostic and the path it was raised
    /// at, whether or not `log_errors` is set.
    pub fn diagnostics(mut self, sink: impl Fn(&DeepError, &str) + 'static) -> Self {
        self.hooks.diagnostics = Some(Rc::new(sink));
        self
    }

    /// Compares two values and returns the structured differences.
    pub fn diff_values(&self, a: &Value, b: &Value) -> Vec<Diff> {
        Context::new(&self.config, &self.hooks).run(a, b)
    }

    /// Compares two values. An empty result means they are equal.
    pub fn equal_values(&self, a: &Value, b: &Value) -> Vec<String> {
        self.diff_values(a, b)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Compares two Rust values through their [`Reflect`] renderings.
    pub fn equal<A, B>(&self, a: &A, b: &B) -> Vec<String>
    where
        A: Reflect + ?Sized,
        B: Reflect + ?Sized,
    {
        self.equal_values(&a.to_value(), &b.to_value())
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Comparator::new()
    }
}
