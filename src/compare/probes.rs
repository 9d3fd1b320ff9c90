//! Discovery of the optional `Error`, `Equal` and `Truncate` capabilities.
//!
//! A capability is present only when the method is exported, reachable on
//! a value that did not come through an unexported field, and has the
//! expected signature. Anything else falls through to structural comparison.

use crate::value::{Kind, Method, Type, Value};

fn has_signature(method: &Method, inputs: &[Type], output: Kind) -> bool {
    method.is_exported()
        && method.inputs() == inputs
        && method.outputs().len() == 1
        && method.outputs()[0].kind() == output
}

/// Calls `Error() string` on `v`.
pub(crate) fn error_string(v: &Value) -> Option<String> {
    if !v.can_interface() {
        return None;
    }
    let found = v.method_by_name("Error")?;
    if !has_signature(found.method(), &[], Kind::String) {
        return None;
    }
    let out = v.call(&found, &[])?;
    out.first()?.as_str().map(str::to_string)
}

/// Calls `a.Equal(b)`. The method must take exactly one argument of the
/// type of `b`, so an `Equal` promoted from an embedded field is never
/// applied to the enclosing struct.
pub(crate) fn call_equal(a: &Value, b: &Value) -> Option<bool> {
    if !a.can_interface() {
        return None;
    }
    let ty = b.ty()?;
    let found = a.method_by_name("Equal")?;
    if !has_signature(found.method(), std::slice::from_ref(ty), Kind::Bool) {
        return None;
    }
    let out = a.call(&found, std::slice::from_ref(b))?;
    out.first()?.as_bool()
}

/// Calls `v.Truncate(precision)` on a timestamp or duration.
pub(crate) fn truncate(v: &Value, precision_nanos: i64) -> Option<Value> {
    let ty = v.ty()?;
    let found = v.method_by_name("Truncate")?;
    if !has_signature(found.method(), &[Type::duration()], ty.kind()) {
        return None;
    }
    let out = v.call(&found, &[Value::duration(precision_nanos)])?;
    out.into_iter().next().filter(|t| t.ty() == Some(ty))
}

/// Returns true for the host timestamp and duration types.
pub(crate) fn is_time_type(ty: &Type) -> bool {
    *ty == Type::timestamp() || *ty == Type::duration()
}
