//! Type-dispatch core of the comparison.

use std::rc::Rc;

use super::errors::DeepError;
use super::path::PathStack;
use super::probes;
use super::sink::{Diff, DiffFilter, DiffSink};
use super::visited::Visited;
use super::{INVALID_VALUE, NIL_POINTER, UNTYPED_NIL};
use crate::config::Config;
use crate::value::{Kind, Type, Value};

/// Returns the identity fields used to match slice elements under the named
/// struct field or map key. An empty list keeps positional matching.
pub type SequenceKeys = Rc<dyn Fn(&str) -> Vec<String>>;

/// Receives each diagnostic along with the path it was raised at.
pub type DiagnosticSink = Rc<dyn Fn(&DeepError, &str)>;

/// Caller-supplied callbacks consulted during a comparison.
#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) filter: Option<DiffFilter>,
    pub(crate) sequence_keys: Option<SequenceKeys>,
    pub(crate) diagnostics: Option<DiagnosticSink>,
}

/// State of one comparison. Never shared between calls.
pub(crate) struct Context<'c> {
    pub(super) config: &'c Config,
    pub(super) hooks: &'c Hooks,
    pub(super) path: PathStack,
    pub(super) sink: DiffSink,
    pub(super) visited: Visited,
}

impl<'c> Context<'c> {
    pub(crate) fn new(config: &'c Config, hooks: &'c Hooks) -> Self {
        Context {
            config,
            hooks,
            path: PathStack::new(),
            sink: DiffSink::new(config.max_diff, hooks.filter.clone()),
            visited: Visited::new(),
        }
    }

    /// Compares two top-level values. Interface values are compared by their
    /// dynamic values, so a nil interface counts as an untyped nil.
    pub(crate) fn run(mut self, a: &Value, b: &Value) -> Vec<Diff> {
        let (a, b) = (dynamic(a), dynamic(b));
        match (a.is_valid(), b.is_valid()) {
            (false, false) => {}
            (false, true) => self.sink.save(&self.path, UNTYPED_NIL, b.to_string()),
            (true, false) => self.sink.save(&self.path, a.to_string(), UNTYPED_NIL),
            (true, true) => self.equals(&a, &b, 0),
        }
        debug_assert!(self.path.is_empty());
        self.sink.into_diffs()
    }

    pub(super) fn equals(&mut self, a: &Value, b: &Value, level: usize) {
        if self.sink.is_full() {
            return;
        }
        if self.config.max_depth > 0 && level > self.config.max_depth {
            self.diagnose(DeepError::MaxRecursion);
            return;
        }

        let (a_ty, b_ty) = match (a.ty(), b.ty()) {
            (None, None) => return,
            (Some(t), None) => {
                self.sink.save(&self.path, t.to_string(), INVALID_VALUE);
                return;
            }
            (None, Some(t)) => {
                self.sink.save(&self.path, INVALID_VALUE, t.to_string());
                return;
            }
            (Some(a_ty), Some(b_ty)) => (a_ty, b_ty),
        };

        if a_ty != b_ty {
            let (left, right) = type_names(a_ty, b_ty);
            self.diagnose(DeepError::type_mismatch(left.clone(), right.clone()));
            self.sink.save(&self.path, left, right);
            return;
        }
        let kind = a_ty.kind();

        // Error() may live on a pointer receiver, so it is probed before
        // dereferencing. Nil indirections fall through to the nil check.
        if !(kind.is_indirect() && (a.is_nil() || b.is_nil())) {
            if let (Some(a_msg), Some(b_msg)) = (probes::error_string(a), probes::error_string(b)) {
                if a_msg != b_msg {
                    self.sink.save(&self.path, a_msg, b_msg);
                }
                return;
            }
        }

        let truncated;
        let (a, b) = match self.truncate_times(a_ty, a, b) {
            Some(pair) => {
                truncated = pair;
                (&truncated.0, &truncated.1)
            }
            None => (a, b),
        };

        if let Some(equal) = probes::call_equal(a, b) {
            if !equal {
                self.sink.save(&self.path, a.to_string(), b.to_string());
            }
            return;
        }

        if kind.is_indirect() {
            match (a.elem(), b.elem()) {
                (None, None) => {}
                (Some(a_elem), None) => {
                    self.sink.save(&self.path, concrete_type(&a_elem), NIL_POINTER)
                }
                (None, Some(b_elem)) => {
                    self.sink.save(&self.path, NIL_POINTER, concrete_type(&b_elem))
                }
                (Some(a_elem), Some(b_elem)) => {
                    if kind == Kind::Ptr {
                        if let (Some(a_addr), Some(b_addr)) = (a.identity(), b.identity()) {
                            if !self.visited.insert(a_addr, b_addr) {
                                return;
                            }
                        }
                    }
                    self.equals(&a_elem, &b_elem, level + 1);
                }
            }
            return;
        }

        match kind {
            Kind::Struct => self.compare_structs(a, b, level),
            Kind::Map => self.compare_maps(a, b, level),
            Kind::Array => self.compare_arrays(a, b, level),
            Kind::Slice => self.compare_slices(a, b, level),
            Kind::Float32 | Kind::Float64 => self.compare_floats(a, b),
            Kind::Func => self.compare_funcs(a, b),
            Kind::Bool
            | Kind::Int
            | Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Int64
            | Kind::Uint
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32
            | Kind::Uint64
            | Kind::String
            | Kind::Timestamp => self.compare_scalars(a, b),
            Kind::Chan | Kind::Ptr | Kind::Interface => {
                self.diagnose(DeepError::NotHandled { kind })
            }
        }
    }

    /// Truncates timestamps and durations to the configured precision.
    fn truncate_times(&self, ty: &Type, a: &Value, b: &Value) -> Option<(Value, Value)> {
        if self.config.time_precision.is_zero() || !probes::is_time_type(ty) {
            return None;
        }
        let precision = i64::try_from(self.config.time_precision.as_nanos()).unwrap_or(i64::MAX);
        Some((
            probes::truncate(a, precision)?,
            probes::truncate(b, precision)?,
        ))
    }

    /// Reports a diagnostic to `tracing` when enabled and to the caller's sink.
    pub(super) fn diagnose(&self, err: DeepError) {
        let path = self.path.to_string();
        if self.config.log_errors {
            tracing::warn!(target: "deep_equal", error = %err, path = %path, "comparison diagnostic");
        }
        if let Some(sink) = &self.hooks.diagnostics {
            sink(&err, &path);
        }
    }
}

/// Names two differing types. Same-named types from different modules are
/// shown with their full module path.
fn type_names(a: &Type, b: &Type) -> (String, String) {
    if a.is_named() && b.is_named() && a.name() == b.name() {
        (a.full_name(), b.full_name())
    } else {
        (a.to_string(), b.to_string())
    }
}

/// Type name of a value, looking through a non-nil interface.
fn concrete_type(v: &Value) -> String {
    let inner = match v.kind() {
        Some(Kind::Interface) => v.elem(),
        _ => None,
    };
    inner
        .as_ref()
        .unwrap_or(v)
        .ty()
        .map(ToString::to_string)
        .unwrap_or_else(|| UNTYPED_NIL.to_string())
}

fn dynamic(v: &Value) -> Value {
    match v.kind() {
        Some(Kind::Interface) => v.elem().unwrap_or_else(Value::nil),
        _ => v.clone(),
    }
}
