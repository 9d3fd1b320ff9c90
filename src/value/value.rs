//! Core value representation.

use chrono::{DateTime, NaiveDate, Utc};
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::error::ValueError;
use super::types::{Kind, Method, MethodRef, Step, StructField, Type};

/// Callable body of a function value.
pub type FuncFn = Rc<dyn Fn(&[Value]) -> Vec<Value>>;

#[derive(Clone)]
pub(crate) enum Data {
    Invalid,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(Rc<str>),
    Timestamp(DateTime<Utc>),
    Array(Rc<[Value]>),
    Slice(Option<Rc<[Value]>>),
    Map(Option<Rc<MapData>>),
    Struct(Rc<[Value]>),
    Ptr(Option<Rc<RefCell<Value>>>),
    Interface(Option<Rc<Value>>),
    Func(Option<FuncFn>),
    Chan(Option<Rc<()>>),
}

/// Map storage: entries in insertion order plus an index from key hash to
/// entry positions. Keys sharing a hash are told apart with [`Value::same`].
pub(crate) struct MapData {
    entries: Vec<(Value, Value)>,
    index: HashMap<u64, Vec<usize>>,
}

impl MapData {
    fn with_capacity(n: usize) -> Self {
        MapData {
            entries: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
        }
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.index
            .get(&key_hash(key))?
            .iter()
            .copied()
            .find(|&i| self.entries[i].0.same(key))
    }

    fn insert(&mut self, key: Value, value: Value) {
        if let Some(i) = self.position(&key) {
            self.entries[i].1 = value;
            return;
        }
        self.index
            .entry(key_hash(&key))
            .or_default()
            .push(self.entries.len());
        self.entries.push((key, value));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Value is a runtime value paired with its [`Type`].
///
/// Cloning a value is cheap: composite contents are shared. Pointers, slices,
/// maps, functions and channels have an identity; two clones of the same
/// pointer refer to the same cell, which is what allows cyclic graphs.
///
/// Values reached through unexported struct fields are marked read-only; the
/// methods of a read-only value are not reachable.
#[derive(Clone)]
pub struct Value {
    ty: Option<Type>,
    data: Data,
    read_only: bool,
}

impl Value {
    /// The untyped nil. It is also what an invalid reflection handle looks like.
    pub fn nil() -> Self {
        Value {
            ty: None,
            data: Data::Invalid,
            read_only: false,
        }
    }

    pub(crate) fn from_parts(ty: &Type, data: Data) -> Self {
        Value {
            ty: Some(ty.clone()),
            data,
            read_only: false,
        }
    }

    pub(crate) fn data(&self) -> &Data {
        &self.data
    }

    /// The zero value of `ty`.
    pub fn zero(ty: &Type) -> Self {
        let data = match ty.kind() {
            Kind::Bool => Data::Bool(false),
            Kind::Int | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 => Data::Int(0),
            Kind::Uint | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 => Data::Uint(0),
            Kind::Float32 | Kind::Float64 => Data::Float(0.0),
            Kind::String => Data::String(Rc::from("")),
            Kind::Timestamp => Data::Timestamp(zero_time()),
            Kind::Array => {
                let elems: Vec<Value> = (0..ty.len()).map(|_| zero_of(ty.elem())).collect();
                Data::Array(elems.into())
            }
            Kind::Struct => {
                let fields: Vec<Value> = ty.fields().iter().map(|f| Value::zero(f.ty())).collect();
                Data::Struct(fields.into())
            }
            Kind::Slice => Data::Slice(None),
            Kind::Map => Data::Map(None),
            Kind::Ptr => Data::Ptr(None),
            Kind::Interface => Data::Interface(None),
            Kind::Func => Data::Func(None),
            Kind::Chan => Data::Chan(None),
        };
        Value::from_parts(ty, data)
    }

    /// Builds a struct value. Missing trailing fields are zeroed and values
    /// bound for interface-typed fields are wrapped.
    pub fn structure(ty: &Type, fields: Vec<Value>) -> Self {
        let mut given = fields.into_iter();
        let data: Vec<Value> = ty
            .fields()
            .iter()
            .map(|f| match given.next() {
                Some(v) => v.assign_to(f.ty()),
                None => Value::zero(f.ty()),
            })
            .collect();
        Value::from_parts(ty, Data::Struct(data.into()))
    }

    /// Builds a fixed-size array value, padding with zero values.
    pub fn array(ty: &Type, elems: Vec<Value>) -> Self {
        let mut given = elems.into_iter();
        let data: Vec<Value> = (0..ty.len())
            .map(|_| match (given.next(), ty.elem()) {
                (Some(v), Some(elem)) => v.assign_to(elem),
                (Some(v), None) => v,
                (None, elem) => zero_of(elem),
            })
            .collect();
        Value::from_parts(ty, Data::Array(data.into()))
    }

    pub fn slice(ty: &Type, elems: Vec<Value>) -> Self {
        let data: Vec<Value> = elems.into_iter().map(|v| v.assign_opt(ty.elem())).collect();
        Value::from_parts(ty, Data::Slice(Some(data.into())))
    }

    pub fn nil_slice(ty: &Type) -> Self {
        Value::from_parts(ty, Data::Slice(None))
    }

    /// Builds a map value. Entries keep their insertion order; a repeated key
    /// replaces the earlier value in place.
    pub fn map(ty: &Type, entries: Vec<(Value, Value)>) -> Self {
        let mut data = MapData::with_capacity(entries.len());
        for (key, value) in entries {
            data.insert(key.assign_opt(ty.key()), value.assign_opt(ty.elem()));
        }
        Value::from_parts(ty, Data::Map(Some(Rc::new(data))))
    }

    pub fn nil_map(ty: &Type) -> Self {
        Value::from_parts(ty, Data::Map(None))
    }

    /// Allocates a new pointer cell holding `elem`, typed `*T` for the type of `elem`.
    pub fn pointer(elem: Value) -> Self {
        let elem_ty = elem.ty.clone().unwrap_or_else(Type::any);
        Value::new_pointer(&elem_ty, elem)
    }

    /// Allocates a new pointer cell of type `*elem_ty`.
    pub fn new_pointer(elem_ty: &Type, elem: Value) -> Self {
        let cell = Rc::new(RefCell::new(elem.assign_to(elem_ty)));
        Value::from_parts(&Type::pointer_to(elem_ty), Data::Ptr(Some(cell)))
    }

    pub fn nil_pointer(elem_ty: &Type) -> Self {
        Value::from_parts(&Type::pointer_to(elem_ty), Data::Ptr(None))
    }

    /// Wraps `inner` in an interface of type `ty`. Interfaces never hold
    /// interfaces: an interface-typed `inner` contributes its dynamic value.
    pub fn interface(ty: &Type, inner: Option<Value>) -> Self {
        let inner = inner.filter(Value::is_valid).and_then(|v| match v.kind() {
            Some(Kind::Interface) => v.elem(),
            _ => Some(v),
        });
        Value::from_parts(ty, Data::Interface(inner.map(Rc::new)))
    }

    pub fn func(ty: &Type, f: impl Fn(&[Value]) -> Vec<Value> + 'static) -> Self {
        Value::from_parts(ty, Data::Func(Some(Rc::new(f))))
    }

    pub fn nil_func(ty: &Type) -> Self {
        Value::from_parts(ty, Data::Func(None))
    }

    pub fn chan(ty: &Type) -> Self {
        Value::from_parts(ty, Data::Chan(Some(Rc::new(()))))
    }

    pub fn nil_chan(ty: &Type) -> Self {
        Value::from_parts(ty, Data::Chan(None))
    }

    /// A `time.Time` value.
    pub fn timestamp(t: DateTime<Utc>) -> Self {
        Value::from_parts(&Type::timestamp(), Data::Timestamp(t))
    }

    /// A `time.Duration` value, in nanoseconds.
    pub fn duration(nanos: i64) -> Self {
        Value::from_parts(&Type::duration(), Data::Int(nanos))
    }

    /// A new error value, a `*errors.errorString` whose `Error` method
    /// returns `message`.
    pub fn error(message: impl AsRef<str>) -> Self {
        let ty = error_string_type();
        let text = Value::from_parts(&Type::string(), Data::String(Rc::from(message.as_ref())));
        Value::new_pointer(&ty, Value::structure(&ty, vec![text]))
    }

    /// Re-types a value. Numeric kinds convert between each other; other
    /// kinds convert when the layouts are identical, as with
    /// `type Celsius float64` or `type Names []string`.
    pub fn convert(&self, ty: &Type) -> Result<Value, ValueError> {
        let from = self
            .ty
            .as_ref()
            .ok_or_else(|| ValueError::conversion("<nil>", ty.to_string()))?;
        let to = ty.kind();
        let data = match &self.data {
            Data::Int(i) if to.is_signed() => Data::Int(*i),
            Data::Int(i) if to.is_unsigned() => Data::Uint(*i as u64),
            Data::Int(i) if to.is_float() => Data::Float(*i as f64),
            Data::Uint(u) if to.is_signed() => Data::Int(*u as i64),
            Data::Uint(u) if to.is_unsigned() => Data::Uint(*u),
            Data::Uint(u) if to.is_float() => Data::Float(*u as f64),
            Data::Float(x) if to.is_signed() => Data::Int(*x as i64),
            Data::Float(x) if to.is_unsigned() => Data::Uint(*x as u64),
            Data::Float(x) if to.is_float() => Data::Float(*x),
            Data::Bool(_) | Data::String(_) | Data::Timestamp(_) if from.kind() == to => {
                self.data.clone()
            }
            data if !data_is_scalar(data) && from.convertible_to(ty) => data.clone(),
            _ => return Err(ValueError::conversion(from.to_string(), ty.to_string())),
        };
        Ok(Value {
            ty: Some(ty.clone()),
            data,
            read_only: self.read_only,
        })
    }

    /// Stores `value` through a non-nil pointer.
    pub fn set_elem(&self, value: Value) -> Result<(), ValueError> {
        let ty = self.ty.as_ref().ok_or_else(|| ValueError::NotPointer {
            ty: "<nil>".to_string(),
        })?;
        match &self.data {
            Data::Ptr(Some(cell)) => {
                *cell.borrow_mut() = value.assign_opt(ty.elem());
                Ok(())
            }
            Data::Ptr(None) => Err(ValueError::NilPointer { ty: ty.to_string() }),
            _ => Err(ValueError::NotPointer { ty: ty.to_string() }),
        }
    }

    pub(crate) fn assign_to(self, target: &Type) -> Value {
        if target.kind() == Kind::Interface && self.ty.as_ref() != Some(target) {
            Value::interface(target, Some(self))
        } else {
            self
        }
    }

    fn assign_opt(self, target: Option<&Type>) -> Value {
        match target {
            Some(t) => self.assign_to(t),
            None => self,
        }
    }

    fn inherit(mut self, read_only: bool) -> Value {
        self.read_only |= read_only;
        self
    }

    /// False only for the untyped nil.
    pub fn is_valid(&self) -> bool {
        self.ty.is_some()
    }

    pub fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    pub fn kind(&self) -> Option<Kind> {
        self.ty.as_ref().map(Type::kind)
    }

    /// Returns false for values obtained through unexported fields.
    pub fn can_interface(&self) -> bool {
        !self.read_only
    }

    /// Returns true for nil pointers, interfaces, slices, maps, functions and channels.
    pub fn is_nil(&self) -> bool {
        match &self.data {
            Data::Slice(s) => s.is_none(),
            Data::Map(m) => m.is_none(),
            Data::Ptr(p) => p.is_none(),
            Data::Interface(i) => i.is_none(),
            Data::Func(f) => f.is_none(),
            Data::Chan(c) => c.is_none(),
            _ => false,
        }
    }

    /// Length of arrays, slices, maps and strings.
    pub fn len(&self) -> usize {
        match &self.data {
            Data::Array(a) => a.len(),
            Data::Slice(Some(s)) => s.len(),
            Data::Map(Some(m)) => m.len(),
            Data::String(s) => s.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Data::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.data {
            Data::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.data {
            Data::Uint(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.data {
            Data::Float(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self.data {
            Data::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// Dereferences a pointer or unwraps an interface. None when nil.
    pub fn elem(&self) -> Option<Value> {
        let inner = match &self.data {
            Data::Ptr(Some(cell)) => cell.borrow().clone(),
            Data::Interface(Some(v)) => Value::clone(v),
            _ => return None,
        };
        Some(inner.inherit(self.read_only))
    }

    pub fn field(&self, i: usize) -> Option<Value> {
        let Data::Struct(fields) = &self.data else {
            return None;
        };
        let exported = self
            .ty
            .as_ref()
            .and_then(|t| t.field(i))
            .is_some_and(StructField::is_exported);
        fields
            .get(i)
            .map(|v| v.clone().inherit(self.read_only || !exported))
    }

    pub fn field_by_name(&self, name: &str) -> Option<Value> {
        let i = self.ty.as_ref()?.field_index(name)?;
        self.field(i)
    }

    /// Element `i` of an array or slice.
    pub fn index(&self, i: usize) -> Option<Value> {
        let elems = match &self.data {
            Data::Array(a) => a,
            Data::Slice(Some(s)) => s,
            _ => return None,
        };
        elems.get(i).map(|v| v.clone().inherit(self.read_only))
    }

    /// Map entries in insertion order.
    pub fn map_entries(&self) -> Vec<(Value, Value)> {
        match &self.data {
            Data::Map(Some(m)) => m
                .entries
                .iter()
                .map(|(k, v)| {
                    (
                        k.clone().inherit(self.read_only),
                        v.clone().inherit(self.read_only),
                    )
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn map_index(&self, key: &Value) -> Option<Value> {
        match &self.data {
            Data::Map(Some(m)) => m
                .position(key)
                .map(|i| m.entries[i].1.clone().inherit(self.read_only)),
            _ => None,
        }
    }

    /// Address of the referenced storage for pointers, slices, maps,
    /// functions and channels.
    pub(crate) fn identity(&self) -> Option<usize> {
        match &self.data {
            Data::Slice(Some(s)) => Some(Rc::as_ptr(s).cast::<Value>() as usize),
            Data::Map(Some(m)) => Some(Rc::as_ptr(m) as usize),
            Data::Ptr(Some(p)) => Some(Rc::as_ptr(p) as usize),
            Data::Func(Some(f)) => Some(Rc::as_ptr(f).cast::<()>() as usize),
            Data::Chan(Some(c)) => Some(Rc::as_ptr(c) as usize),
            _ => None,
        }
    }

    pub fn method_by_name(&self, name: &str) -> Option<MethodRef> {
        self.ty.as_ref()?.method_by_name(name)
    }

    /// Calls a method found by [`Value::method_by_name`]. Returns None when
    /// the receiver cannot be reached, e.g. through a nil embedded pointer.
    pub fn call(&self, method: &MethodRef, args: &[Value]) -> Option<Vec<Value>> {
        let mut receiver = self.clone();
        for step in method.path() {
            receiver = match step {
                Step::Deref => receiver.elem()?,
                Step::Field(i) => receiver.field(*i)?,
            };
        }
        Some(method.method().call(&receiver, args))
    }

    pub fn call_method(&self, name: &str, args: &[Value]) -> Option<Vec<Value>> {
        let method = self.method_by_name(name)?;
        self.call(&method, args)
    }

    /// Host `==` semantics, used for map key lookup: scalars and aggregates
    /// by content, references by identity.
    pub fn same(&self, other: &Value) -> bool {
        if self.ty != other.ty {
            return false;
        }
        match (&self.data, &other.data) {
            (Data::Invalid, Data::Invalid) => true,
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Int(a), Data::Int(b)) => a == b,
            (Data::Uint(a), Data::Uint(b)) => a == b,
            (Data::Float(a), Data::Float(b)) => a == b,
            (Data::String(a), Data::String(b)) => a == b,
            (Data::Timestamp(a), Data::Timestamp(b)) => a == b,
            (Data::Array(a), Data::Array(b)) | (Data::Struct(a), Data::Struct(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.same(y))
            }
            (Data::Interface(a), Data::Interface(b)) => match (a, b) {
                (None, None) => true,
                (Some(x), Some(y)) => x.same(y),
                _ => false,
            },
            (Data::Slice(_), Data::Slice(_))
            | (Data::Map(_), Data::Map(_))
            | (Data::Ptr(_), Data::Ptr(_))
            | (Data::Func(_), Data::Func(_))
            | (Data::Chan(_), Data::Chan(_)) => self.identity() == other.identity(),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "Value({}: {})", ty, self),
            None => write!(f, "Value(<nil>)"),
        }
    }
}

/// Hash consistent with [`Value::same`]: values that are the same hash
/// equally. Types are left out; `same` rejects differing types.
fn key_hash(v: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_data(v, &mut hasher);
    hasher.finish()
}

fn hash_data(v: &Value, state: &mut DefaultHasher) {
    std::mem::discriminant(&v.data).hash(state);
    match &v.data {
        Data::Invalid => {}
        Data::Bool(b) => b.hash(state),
        Data::Int(i) => i.hash(state),
        Data::Uint(u) => u.hash(state),
        // -0.0 == 0.0, so both hash as positive zero.
        Data::Float(x) => (if *x == 0.0 { 0.0f64 } else { *x }).to_bits().hash(state),
        Data::String(s) => s.hash(state),
        Data::Timestamp(t) => t.hash(state),
        Data::Array(elems) | Data::Struct(elems) => {
            for elem in elems.iter() {
                hash_data(elem, state);
            }
        }
        Data::Interface(inner) => {
            if let Some(inner) = inner {
                hash_data(inner, state);
            }
        }
        Data::Slice(_) | Data::Map(_) | Data::Ptr(_) | Data::Func(_) | Data::Chan(_) => {
            v.identity().hash(state)
        }
    }
}

fn zero_of(ty: Option<&Type>) -> Value {
    ty.map(Value::zero).unwrap_or_else(Value::nil)
}

fn zero_time() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn data_is_scalar(data: &Data) -> bool {
    matches!(
        data,
        Data::Bool(_)
            | Data::Int(_)
            | Data::Uint(_)
            | Data::Float(_)
            | Data::String(_)
            | Data::Timestamp(_)
    )
}

fn error_string_type() -> Type {
    thread_local! {
        static TYPE: Type = {
            let ty = Type::structure(
                "errorString",
                "errors",
                vec![StructField::new("s", &Type::string())],
            );
            ty.add_method(
                Method::new("Error", vec![], vec![Type::string()], |receiver, _| {
                    receiver
                        .elem()
                        .and_then(|s| s.field(0))
                        .map(|msg| vec![msg])
                        .unwrap_or_default()
                })
                .on_pointer(),
            );
            ty
        };
    }
    TYPE.with(Type::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Reflect;

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(&Type::int()).as_i64(), Some(0));
        assert_eq!(Value::zero(&Type::string()).as_str(), Some(""));
        assert!(Value::zero(&Type::slice_of(&Type::int())).is_nil());
        assert!(Value::zero(&Type::pointer_to(&Type::int())).is_nil());
        assert_eq!(Value::zero(&Type::array_of(&Type::bool(), 3)).len(), 3);
    }

    #[test]
    fn test_struct_fields_and_visibility() {
        let ty = Type::structure(
            "T",
            "deep",
            vec![
                StructField::new("Name", &Type::string()),
                StructField::new("id", &Type::int()),
            ],
        );
        let v = Value::structure(&ty, vec!["foo".to_value()]);
        let name = v.field(0).expect("Name");
        let id = v.field_by_name("id").expect("id");
        assert_eq!(name.as_str(), Some("foo"));
        assert!(name.can_interface());
        assert_eq!(id.as_i64(), Some(0));
        assert!(!id.can_interface());
    }

    #[test]
    fn test_interface_wrapping() {
        let any = Type::any();
        let ty = Type::slice_of(&any);
        let v = Value::slice(&ty, vec![1i64.to_value(), Value::nil()]);
        let first = v.index(0).expect("elem");
        assert_eq!(first.kind(), Some(Kind::Interface));
        assert_eq!(first.elem().and_then(|e| e.as_i64()), Some(1));
        assert!(v.index(1).is_some_and(|e| e.is_nil()));

        let nested = Value::interface(&any, Some(first.clone()));
        assert_eq!(nested.elem().and_then(|e| e.kind()), Some(Kind::Int64));
    }

    #[test]
    fn test_pointer_cycle() {
        let node = Type::declare_struct("Node", "deep");
        node.define_fields(vec![StructField::new("Next", &Type::pointer_to(&node))])
            .expect("fields");
        let p = Value::new_pointer(&node, Value::zero(&node));
        p.set_elem(Value::structure(&node, vec![p.clone()]))
            .expect("store");

        let next = p.elem().and_then(|n| n.field(0)).expect("Next");
        assert_eq!(next.identity(), p.identity());
        assert!(node.define_fields(vec![]).is_err());
    }

    #[test]
    fn test_set_elem_errors() {
        let nil = Value::nil_pointer(&Type::int());
        assert!(matches!(
            nil.set_elem(1isize.to_value()),
            Err(ValueError::NilPointer { .. })
        ));
        assert!(matches!(
            1isize.to_value().set_elem(Value::nil()),
            Err(ValueError::NotPointer { .. })
        ));
    }

    #[test]
    fn test_map_lookup_and_duplicates() {
        let ty = Type::map_of(&Type::string(), &Type::int());
        let m = Value::map(
            &ty,
            vec![
                ("foo".to_value(), 1isize.to_value()),
                ("bar".to_value(), 2isize.to_value()),
                ("foo".to_value(), 3isize.to_value()),
            ],
        );
        assert_eq!(m.len(), 2);
        assert_eq!(m.map_index(&"foo".to_value()).and_then(|v| v.as_i64()), Some(3));
        assert!(m.map_index(&"baz".to_value()).is_none());
    }

    #[test]
    fn test_map_index_follows_same() {
        let ints = Value::map(
            &Type::map_of(&Type::int64(), &Type::int64()),
            (0..10_000i64).map(|k| (k.to_value(), (k * 2).to_value())).collect(),
        );
        assert_eq!(ints.len(), 10_000);
        assert_eq!(ints.map_index(&4_321i64.to_value()).and_then(|v| v.as_i64()), Some(8_642));
        assert!(ints.map_index(&10_000i64.to_value()).is_none());

        let floats = Value::map(
            &Type::map_of(&Type::float64(), &Type::string()),
            vec![
                (0.0f64.to_value(), "zero".to_value()),
                ((-0.0f64).to_value(), "negative zero".to_value()),
            ],
        );
        assert_eq!(floats.len(), 1);
        assert_eq!(
            floats.map_index(&0.0f64.to_value()).and_then(|v| v.as_str().map(str::to_string)),
            Some("negative zero".to_string())
        );

        let any = Value::map(
            &Type::map_of(&Type::any(), &Type::int()),
            vec![("a".to_value(), 1isize.to_value()), (1isize.to_value(), 2isize.to_value())],
        );
        let key = Value::interface(&Type::any(), Some("a".to_value()));
        assert_eq!(any.map_index(&key).and_then(|v| v.as_i64()), Some(1));

        let elem = Type::int();
        let (p, q) = (
            Value::new_pointer(&elem, 1isize.to_value()),
            Value::new_pointer(&elem, 1isize.to_value()),
        );
        let by_ptr = Value::map(
            &Type::map_of(&Type::pointer_to(&elem), &Type::string()),
            vec![(p.clone(), "p".to_value()), (q.clone(), "q".to_value())],
        );
        assert_eq!(by_ptr.len(), 2);
        assert_eq!(
            by_ptr.map_index(&q).and_then(|v| v.as_str().map(str::to_string)),
            Some("q".to_string())
        );
    }

    #[test]
    fn test_convert() {
        let t1 = Type::named("T1", "deep", &Type::int());
        let v = 7isize.to_value().convert(&t1).expect("convert");
        assert_eq!(v.ty(), Some(&t1));
        assert_eq!(v.as_i64(), Some(7));

        let f = 7isize.to_value().convert(&Type::float64()).expect("convert");
        assert_eq!(f.as_f64(), Some(7.0));

        assert!("x".to_value().convert(&t1).is_err());
        assert!(Value::nil().convert(&t1).is_err());

        let names = Type::named("Names", "deep", &Type::slice_of(&Type::string()));
        let v = vec!["a".to_string()].to_value().convert(&names).expect("convert");
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_error_value() {
        let err = Value::error("it broke");
        assert_eq!(err.ty().map(ToString::to_string).as_deref(), Some("*errors.errorString"));
        let msg = err.call_method("Error", &[]).expect("Error method");
        assert_eq!(msg[0].as_str(), Some("it broke"));
    }
}
