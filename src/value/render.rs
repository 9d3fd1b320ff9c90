//! Default value rendering, as produced by the host's `%v` verb.

use std::cmp::Ordering;
use std::fmt;

use super::time::format_timestamp;
use super::types::Kind;
use super::value::{Data, Value};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, v: &Value, depth: usize) -> fmt::Result {
    let Some(ty) = v.ty() else {
        return f.write_str("<nil>");
    };
    if let Some(text) = stringer(v) {
        return f.write_str(&text);
    }

    match v.data() {
        Data::Invalid => f.write_str("<nil>"),
        Data::Bool(b) => write!(f, "{}", b),
        Data::Int(i) => write!(f, "{}", i),
        Data::Uint(u) => write!(f, "{}", u),
        Data::Float(x) => f.write_str(&format_float(*x, float_bits(ty.kind()))),
        Data::String(s) => f.write_str(s),
        Data::Timestamp(t) => f.write_str(&format_timestamp(t)),
        Data::Array(elems) | Data::Slice(Some(elems)) => {
            f.write_str("[")?;
            for (i, elem) in elems.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write_value(f, elem, depth + 1)?;
            }
            f.write_str("]")
        }
        Data::Slice(None) => f.write_str("[]"),
        Data::Map(Some(_)) => {
            let mut entries = v.map_entries();
            entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
            f.write_str("map[")?;
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write_value(f, key, depth + 1)?;
                f.write_str(":")?;
                write_value(f, value, depth + 1)?;
            }
            f.write_str("]")
        }
        Data::Map(None) => f.write_str("map[]"),
        Data::Struct(_) => {
            f.write_str("{")?;
            for i in 0..ty.fields().len() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                if let Some(field) = v.field(i) {
                    write_value(f, &field, depth + 1)?;
                }
            }
            f.write_str("}")
        }
        Data::Ptr(Some(_)) => match v.elem() {
            Some(elem)
                if depth == 0
                    && matches!(
                        elem.kind(),
                        Some(Kind::Array | Kind::Slice | Kind::Struct | Kind::Map)
                    ) =>
            {
                f.write_str("&")?;
                write_value(f, &elem, depth + 1)
            }
            _ => write_address(f, v),
        },
        Data::Interface(Some(_)) => match v.elem() {
            Some(inner) => write_value(f, &inner, depth),
            None => f.write_str("<nil>"),
        },
        Data::Func(Some(_)) | Data::Chan(Some(_)) => write_address(f, v),
        Data::Ptr(None) | Data::Interface(None) | Data::Func(None) | Data::Chan(None) => {
            f.write_str("<nil>")
        }
    }
}

fn write_address(f: &mut fmt::Formatter<'_>, v: &Value) -> fmt::Result {
    write!(f, "0x{:x}", v.identity().unwrap_or(0))
}

/// Calls `Error() string` or `String() string` when the value exposes one.
fn stringer(v: &Value) -> Option<String> {
    if !v.can_interface() || (v.kind()?.is_indirect() && v.is_nil()) {
        return None;
    }
    ["Error", "String"].iter().find_map(|name| {
        let found = v.method_by_name(name)?;
        let method = found.method();
        if !method.inputs().is_empty()
            || method.outputs().len() != 1
            || method.outputs()[0].kind() != Kind::String
        {
            return None;
        }
        let out = v.call(&found, &[])?;
        out.first()?.as_str().map(str::to_string)
    })
}

fn float_bits(kind: Kind) -> u32 {
    match kind {
        Kind::Float32 => 32,
        _ => 64,
    }
}

/// Renders a float in the shortest form that round-trips at the given bit
/// size, switching to exponent form for exponents below -4 or from 6 up:
/// `1.5`, `1e+06`, `1e-05`, `NaN`, `+Inf`.
pub fn format_float(x: f64, bits: u32) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }

    let (sci, plain) = if bits == 32 {
        let x = x as f32;
        (format!("{:e}", x), format!("{}", x))
    } else {
        (format!("{:e}", x), format!("{}", x))
    };
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return plain;
    };
    let exp: i32 = match exp.parse() {
        Ok(exp) => exp,
        Err(_) => return plain,
    };
    if (-4..6).contains(&exp) {
        plain
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
    }
}

/// Orders map keys for display. Keys of other kinds keep insertion order.
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a.data(), b.data()) {
        (Data::Bool(x), Data::Bool(y)) => x.cmp(y),
        (Data::Int(x), Data::Int(y)) => x.cmp(y),
        (Data::Uint(x), Data::Uint(y)) => x.cmp(y),
        (Data::Float(x), Data::Float(y)) => x.total_cmp(y),
        (Data::String(x), Data::String(y)) => x.cmp(y),
        (Data::Timestamp(x), Data::Timestamp(y)) => x.cmp(y),
        (Data::Interface(Some(x)), Data::Interface(Some(y))) => compare_keys(x, y),
        _ => Ordering::Equal,
    }
}
