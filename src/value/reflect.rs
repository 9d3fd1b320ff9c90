//! Conversion of Rust values into reflective [`Value`]s.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;

use super::types::Type;
use super::value::{Data, Value};

/// Reflect gives a Rust type a runtime [`Type`] and a [`Value`] rendering.
///
/// Rust types map onto the host type names: `i64` is `int64`, `isize` is
/// `int`, `Vec<T>` is `[]T`, `Option<T>` is `*T`, `HashMap<K, V>` is
/// `map[K]V`. A `Value` reflects as itself, typed `interface {}`.
pub trait Reflect {
    fn reflect_type() -> Type;

    fn to_value(&self) -> Value;
}

macro_rules! reflect_scalar {
    ($($rust:ty => $ctor:ident, $variant:ident, $cast:ty);* $(;)?) => {
        $(
            impl Reflect for $rust {
                fn reflect_type() -> Type {
                    Type::$ctor()
                }

                fn to_value(&self) -> Value {
                    Value::from_parts(&Type::$ctor(), Data::$variant(*self as $cast))
                }
            }
        )*
    };
}

reflect_scalar! {
    i8 => int8, Int, i64;
    i16 => int16, Int, i64;
    i32 => int32, Int, i64;
    i64 => int64, Int, i64;
    isize => int, Int, i64;
    u8 => uint8, Uint, u64;
    u16 => uint16, Uint, u64;
    u32 => uint32, Uint, u64;
    u64 => uint64, Uint, u64;
    usize => uint, Uint, u64;
    f32 => float32, Float, f64;
    f64 => float64, Float, f64;
}

impl Reflect for bool {
    fn reflect_type() -> Type {
        Type::bool()
    }

    fn to_value(&self) -> Value {
        Value::from_parts(&Type::bool(), Data::Bool(*self))
    }
}

impl Reflect for String {
    fn reflect_type() -> Type {
        Type::string()
    }

    fn to_value(&self) -> Value {
        self.as_str().to_value()
    }
}

impl Reflect for str {
    fn reflect_type() -> Type {
        Type::string()
    }

    fn to_value(&self) -> Value {
        Value::from_parts(&Type::string(), Data::String(Rc::from(self)))
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect_type() -> Type {
        T::reflect_type()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_type() -> Type {
        Type::slice_of(&T::reflect_type())
    }

    fn to_value(&self) -> Value {
        Value::slice(
            &Self::reflect_type(),
            self.iter().map(Reflect::to_value).collect(),
        )
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect_type() -> Type {
        Type::array_of(&T::reflect_type(), N)
    }

    fn to_value(&self) -> Value {
        Value::array(
            &Self::reflect_type(),
            self.iter().map(Reflect::to_value).collect(),
        )
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn reflect_type() -> Type {
        Type::pointer_to(&T::reflect_type())
    }

    fn to_value(&self) -> Value {
        let elem = T::reflect_type();
        match self {
            Some(v) => Value::new_pointer(&elem, v.to_value()),
            None => Value::nil_pointer(&elem),
        }
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect_type() -> Type {
        Type::map_of(&K::reflect_type(), &V::reflect_type())
    }

    fn to_value(&self) -> Value {
        Value::map(
            &Self::reflect_type(),
            self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect(),
        )
    }
}

impl<K: Reflect, V: Reflect, S: BuildHasher> Reflect for HashMap<K, V, S> {
    fn reflect_type() -> Type {
        Type::map_of(&K::reflect_type(), &V::reflect_type())
    }

    fn to_value(&self) -> Value {
        Value::map(
            &Self::reflect_type(),
            self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect(),
        )
    }
}

impl Reflect for DateTime<Utc> {
    fn reflect_type() -> Type {
        Type::timestamp()
    }

    fn to_value(&self) -> Value {
        Value::timestamp(*self)
    }
}

impl Reflect for std::time::Duration {
    fn reflect_type() -> Type {
        Type::duration()
    }

    fn to_value(&self) -> Value {
        Value::duration(i64::try_from(self.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl Reflect for Value {
    fn reflect_type() -> Type {
        Type::any()
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// The unit type reflects as the untyped nil.
impl Reflect for () {
    fn reflect_type() -> Type {
        Type::any()
    }

    fn to_value(&self) -> Value {
        Value::nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;

    #[test]
    fn test_scalar_types() {
        assert_eq!(1i64.to_value().ty(), Some(&Type::int64()));
        assert_eq!(1isize.to_value().kind(), Some(Kind::Int));
        assert_eq!(1u8.to_value().as_u64(), Some(1));
        assert_eq!(1.5f32.to_value().kind(), Some(Kind::Float32));
        assert_eq!("foo".to_value().as_str(), Some("foo"));
        assert_eq!(String::from("foo").to_value().ty(), Some(&Type::string()));
        assert!(!().to_value().is_valid());
    }

    #[test]
    fn test_composite_types() {
        let v = vec![1i64, 2].to_value();
        assert_eq!(v.ty().map(ToString::to_string).as_deref(), Some("[]int64"));
        assert_eq!(v.len(), 2);

        let a = [true, false, true].to_value();
        assert_eq!(a.ty().map(ToString::to_string).as_deref(), Some("[3]bool"));

        let p = Some(3i32).to_value();
        assert_eq!(p.elem().and_then(|e| e.as_i64()), Some(3));
        assert!(None::<i32>.to_value().is_nil());

        let mut m = HashMap::new();
        m.insert("a".to_string(), vec![1u16]);
        assert_eq!(
            m.to_value().ty().map(ToString::to_string).as_deref(),
            Some("map[string][]uint16")
        );
    }

    #[test]
    fn test_duration_and_value() {
        let d = std::time::Duration::from_micros(3).to_value();
        assert_eq!(d.ty(), Some(&Type::duration()));
        assert_eq!(d.as_i64(), Some(3_000));

        let v = 1i64.to_value();
        assert_eq!(v.to_value().ty(), Some(&Type::int64()));
    }
}
