//! Runtime type descriptors.
//!
//! A [`Type`] is the reflective half of a [`Value`]: it names the type, records
//! its [`Kind`] and element/field layout, and carries a method table that the
//! comparison engine probes for optional capabilities (`Equal`, `Error`,
//! `Truncate`, `String`).

use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::error::ValueError;
use super::time;
use super::value::Value;

/// Kind is the fundamental shape of a value, independent of its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
    Array,
    Slice,
    Map,
    Struct,
    Ptr,
    Interface,
    Func,
    Chan,
    Timestamp,
}

impl Kind {
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            Kind::Int | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64
        )
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Kind::Uint | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Kind::Float32 | Kind::Float64)
    }

    /// Returns true for pointers and interfaces, the kinds that wrap another value.
    pub fn is_indirect(&self) -> bool {
        matches!(self, Kind::Ptr | Kind::Interface)
    }

    /// Returns true for kinds whose values may be nil.
    pub fn is_nilable(&self) -> bool {
        matches!(
            self,
            Kind::Ptr | Kind::Interface | Kind::Slice | Kind::Map | Kind::Func | Kind::Chan
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Ptr => "ptr",
            Kind::Interface => "interface",
            Kind::Func => "func",
            Kind::Chan => "chan",
            Kind::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Callable body of a method. Receives the receiver and the arguments.
pub type MethodFn = Rc<dyn Fn(&Value, &[Value]) -> Vec<Value>>;

/// Receiver says whether a method is declared on `T` or on `*T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    Value,
    Pointer,
}

/// Method is one entry of a type's method table.
#[derive(Clone)]
pub struct Method {
    name: String,
    inputs: Vec<Type>,
    outputs: Vec<Type>,
    receiver: Receiver,
    func: MethodFn,
}

impl Method {
    /// Creates a value-receiver method.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<Type>,
        outputs: Vec<Type>,
        func: impl Fn(&Value, &[Value]) -> Vec<Value> + 'static,
    ) -> Self {
        Method {
            name: name.into(),
            inputs,
            outputs,
            receiver: Receiver::Value,
            func: Rc::new(func),
        }
    }

    /// Moves the method onto the pointer receiver, so only `*T` has it.
    pub fn on_pointer(mut self) -> Self {
        self.receiver = Receiver::Pointer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[Type] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Type] {
        &self.outputs
    }

    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    /// Exported methods start with an uppercase letter.
    pub fn is_exported(&self) -> bool {
        is_exported_name(&self.name)
    }

    /// Invokes the method body directly on `receiver`.
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Vec<Value> {
        (self.func)(receiver, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        write_signature(f, &self.inputs, &self.outputs)
    }
}

/// One navigation step from a value to the receiver of a promoted method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Deref,
    Field(usize),
}

/// MethodRef is the result of a method lookup: the method plus the path from
/// the looked-up value to the receiver the method is declared on.
#[derive(Debug, Clone)]
pub struct MethodRef {
    method: Method,
    path: Vec<Step>,
}

impl MethodRef {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns true if the method is declared on the type itself rather than
    /// promoted through a pointer or embedded field.
    pub fn is_direct(&self) -> bool {
        self.path.is_empty()
    }

    pub(crate) fn path(&self) -> &[Step] {
        &self.path
    }
}

/// StructTag is the raw annotation string of a struct field,
/// conventionally `key:"value" other:"value"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag(String);

impl StructTag {
    pub fn new(tag: impl Into<String>) -> Self {
        StructTag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Looks up the quoted value associated with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut tag = self.0.as_str();
        loop {
            tag = tag.trim_start_matches(' ');
            if tag.is_empty() {
                return None;
            }

            let name_len = tag
                .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
                .unwrap_or(tag.len());
            if name_len == 0 || !tag[name_len..].starts_with(":\"") {
                return None;
            }
            let name = &tag[..name_len];
            tag = &tag[name_len + 1..];

            let bytes = tag.as_bytes();
            let mut end = 1;
            while end < bytes.len() && bytes[end] != b'"' {
                if bytes[end] == b'\\' {
                    end += 1;
                }
                end += 1;
            }
            if end >= bytes.len() {
                return None;
            }
            let value = &tag[1..end];
            tag = &tag[end + 1..];

            if name == key {
                return Some(value);
            }
        }
    }
}

impl From<&str> for StructTag {
    fn from(s: &str) -> Self {
        StructTag(s.to_string())
    }
}

/// StructField describes one field of a struct type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    name: String,
    ty: Type,
    tag: StructTag,
    embedded: bool,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: &Type) -> Self {
        StructField {
            name: name.into(),
            ty: ty.clone(),
            tag: StructTag::default(),
            embedded: false,
        }
    }

    /// Creates an embedded (anonymous) field. The field is named after its
    /// type, dereferenced once for pointer types.
    pub fn embedded(ty: &Type) -> Self {
        let named = match ty.kind() {
            Kind::Ptr => ty.elem().cloned().unwrap_or_else(|| ty.clone()),
            _ => ty.clone(),
        };
        StructField {
            name: named.name().to_string(),
            ty: ty.clone(),
            tag: StructTag::default(),
            embedded: true,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<StructTag>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn tag(&self) -> &StructTag {
        &self.tag
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn is_exported(&self) -> bool {
        is_exported_name(&self.name)
    }

    /// Fields tagged `deep:"-"` are skipped by the comparison engine.
    pub fn is_ignored(&self) -> bool {
        self.tag.get("deep") == Some("-")
    }
}

pub(crate) fn is_exported_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

struct TypeInner {
    name: String,
    pkg_path: String,
    kind: Kind,
    elem: Option<Type>,
    key: Option<Type>,
    len: usize,
    fields: OnceCell<Vec<StructField>>,
    inputs: Vec<Type>,
    outputs: Vec<Type>,
    methods: RefCell<Vec<Method>>,
}

impl TypeInner {
    fn new(kind: Kind) -> Self {
        TypeInner {
            name: String::new(),
            pkg_path: String::new(),
            kind,
            elem: None,
            key: None,
            len: 0,
            fields: OnceCell::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            methods: RefCell::new(Vec::new()),
        }
    }
}

/// Type is a shared handle to a runtime type descriptor.
///
/// Named types are identical when their kind, package path and name agree.
/// Anonymous types (`[]int`, `map[string]int`, `*T`, ...) are identical when
/// they are structurally identical.
#[derive(Clone)]
pub struct Type(Rc<TypeInner>);

macro_rules! basic_type {
    ($($(#[$doc:meta])* $fn_name:ident => $kind:expr),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $fn_name() -> Type {
                thread_local! {
                    static TYPE: Type = Type::basic($kind);
                }
                TYPE.with(Type::clone)
            }
        )*
    };
}

/// Limits method promotion through embedded fields.
const MAX_PROMOTION_DEPTH: usize = 16;

impl Type {
    fn from_inner(inner: TypeInner) -> Self {
        Type(Rc::new(inner))
    }

    fn basic(kind: Kind) -> Self {
        let mut inner = TypeInner::new(kind);
        inner.name = kind.name().to_string();
        Type::from_inner(inner)
    }

    basic_type! {
        bool => Kind::Bool,
        int => Kind::Int,
        int8 => Kind::Int8,
        int16 => Kind::Int16,
        int32 => Kind::Int32,
        int64 => Kind::Int64,
        uint => Kind::Uint,
        uint8 => Kind::Uint8,
        uint16 => Kind::Uint16,
        uint32 => Kind::Uint32,
        uint64 => Kind::Uint64,
        float32 => Kind::Float32,
        float64 => Kind::Float64,
        string => Kind::String,
    }

    /// The empty interface, `interface {}`.
    pub fn any() -> Type {
        thread_local! {
            static TYPE: Type = Type::from_inner(TypeInner::new(Kind::Interface));
        }
        TYPE.with(Type::clone)
    }

    /// The predeclared `error` interface.
    pub fn error() -> Type {
        thread_local! {
            static TYPE: Type = Type::interface("error", "", &[("Error", vec![], vec![Type::string()])]);
        }
        TYPE.with(Type::clone)
    }

    /// The host timestamp type, `time.Time`.
    pub fn timestamp() -> Type {
        time::timestamp_type()
    }

    /// The host duration type, `time.Duration`.
    pub fn duration() -> Type {
        time::duration_type()
    }

    /// A named type of a primitive kind provided by the host, like `time.Time`.
    pub(crate) fn host(name: &str, pkg_path: &str, kind: Kind) -> Type {
        let mut inner = TypeInner::new(kind);
        inner.name = name.to_string();
        inner.pkg_path = pkg_path.to_string();
        Type::from_inner(inner)
    }

    /// Declares a named type with the same layout as `underlying`,
    /// like `type Celsius float64`. Methods are not inherited.
    pub fn named(name: impl Into<String>, pkg_path: impl Into<String>, underlying: &Type) -> Type {
        let src = &underlying.0;
        let mut inner = TypeInner::new(src.kind);
        inner.name = name.into();
        inner.pkg_path = pkg_path.into();
        inner.elem = src.elem.clone();
        inner.key = src.key.clone();
        inner.len = src.len;
        inner.inputs = src.inputs.clone();
        inner.outputs = src.outputs.clone();
        if let Some(fields) = src.fields.get() {
            let _ = inner.fields.set(fields.clone());
        }
        Type::from_inner(inner)
    }

    /// Declares a named struct type with the given fields.
    pub fn structure(
        name: impl Into<String>,
        pkg_path: impl Into<String>,
        fields: Vec<StructField>,
    ) -> Type {
        let ty = Type::declare_struct(name, pkg_path);
        let _ = ty.0.fields.set(fields);
        ty
    }

    /// Declares a named struct type whose fields are supplied later through
    /// [`Type::define_fields`]. This is how self-referential types are built.
    pub fn declare_struct(name: impl Into<String>, pkg_path: impl Into<String>) -> Type {
        let mut inner = TypeInner::new(Kind::Struct);
        inner.name = name.into();
        inner.pkg_path = pkg_path.into();
        Type::from_inner(inner)
    }

    /// Supplies the fields of a struct declared with [`Type::declare_struct`].
    pub fn define_fields(&self, fields: Vec<StructField>) -> Result<(), ValueError> {
        self.0
            .fields
            .set(fields)
            .map_err(|_| ValueError::FieldsDefined {
                ty: self.to_string(),
            })
    }

    /// An anonymous struct type, `struct { ... }`.
    pub fn anonymous_struct(fields: Vec<StructField>) -> Type {
        let inner = TypeInner::new(Kind::Struct);
        let _ = inner.fields.set(fields);
        Type::from_inner(inner)
    }

    pub fn slice_of(elem: &Type) -> Type {
        let mut inner = TypeInner::new(Kind::Slice);
        inner.elem = Some(elem.clone());
        Type::from_inner(inner)
    }

    pub fn array_of(elem: &Type, len: usize) -> Type {
        let mut inner = TypeInner::new(Kind::Array);
        inner.elem = Some(elem.clone());
        inner.len = len;
        Type::from_inner(inner)
    }

    pub fn map_of(key: &Type, elem: &Type) -> Type {
        let mut inner = TypeInner::new(Kind::Map);
        inner.key = Some(key.clone());
        inner.elem = Some(elem.clone());
        Type::from_inner(inner)
    }

    pub fn pointer_to(elem: &Type) -> Type {
        let mut inner = TypeInner::new(Kind::Ptr);
        inner.elem = Some(elem.clone());
        Type::from_inner(inner)
    }

    pub fn chan_of(elem: &Type) -> Type {
        let mut inner = TypeInner::new(Kind::Chan);
        inner.elem = Some(elem.clone());
        Type::from_inner(inner)
    }

    pub fn func_of(inputs: Vec<Type>, outputs: Vec<Type>) -> Type {
        let mut inner = TypeInner::new(Kind::Func);
        inner.inputs = inputs;
        inner.outputs = outputs;
        Type::from_inner(inner)
    }

    /// Declares an interface type. Each method is registered as a forwarder
    /// that dispatches to the dynamic value held by the interface.
    pub fn interface(
        name: impl Into<String>,
        pkg_path: impl Into<String>,
        methods: &[(&str, Vec<Type>, Vec<Type>)],
    ) -> Type {
        let mut inner = TypeInner::new(Kind::Interface);
        inner.name = name.into();
        inner.pkg_path = pkg_path.into();
        let ty = Type::from_inner(inner);
        for (name, inputs, outputs) in methods {
            let target = name.to_string();
            ty.add_method(Method::new(
                *name,
                inputs.clone(),
                outputs.clone(),
                move |receiver, args| {
                    receiver
                        .elem()
                        .and_then(|dynamic| dynamic.call_method(&target, args))
                        .unwrap_or_default()
                },
            ));
        }
        ty
    }

    /// Registers a method on this type.
    pub fn add_method(&self, method: Method) {
        self.0.methods.borrow_mut().push(method);
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn pkg_path(&self) -> &str {
        &self.0.pkg_path
    }

    pub fn kind(&self) -> Kind {
        self.0.kind
    }

    pub fn is_named(&self) -> bool {
        !self.0.name.is_empty()
    }

    /// Element type of arrays, slices, maps, pointers and channels.
    pub fn elem(&self) -> Option<&Type> {
        self.0.elem.as_ref()
    }

    /// Key type of maps.
    pub fn key(&self) -> Option<&Type> {
        self.0.key.as_ref()
    }

    /// Length of array types.
    pub fn len(&self) -> usize {
        self.0.len
    }

    pub fn is_empty(&self) -> bool {
        self.0.len == 0
    }

    /// Fields of struct types, in declaration order.
    pub fn fields(&self) -> &[StructField] {
        self.0.fields.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn field(&self, i: usize) -> Option<&StructField> {
        self.fields().get(i)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name() == name)
    }

    /// Parameter types of function types.
    pub fn inputs(&self) -> &[Type] {
        &self.0.inputs
    }

    /// Result types of function types.
    pub fn outputs(&self) -> &[Type] {
        &self.0.outputs
    }

    /// Returns `path/to/pkg.Name`, or the plain name for predeclared types.
    pub fn full_name(&self) -> String {
        if self.0.pkg_path.is_empty() {
            self.to_string()
        } else {
            format!("{}.{}", self.0.pkg_path, self.0.name)
        }
    }

    /// Looks up a method in the method set of this type, including methods
    /// of the pointee for pointer types and methods promoted from embedded
    /// struct fields.
    pub fn method_by_name(&self, name: &str) -> Option<MethodRef> {
        self.lookup_method(name, 0)
    }

    fn own_method(&self, name: &str, receiver: Receiver) -> Option<Method> {
        self.0
            .methods
            .borrow()
            .iter()
            .find(|m| m.name == name && m.receiver == receiver)
            .cloned()
    }

    fn lookup_method(&self, name: &str, depth: usize) -> Option<MethodRef> {
        if depth > MAX_PROMOTION_DEPTH {
            return None;
        }
        if let Some(method) = self.own_method(name, Receiver::Value) {
            return Some(MethodRef {
                method,
                path: Vec::new(),
            });
        }

        match self.kind() {
            Kind::Ptr => {
                let elem = self.elem()?;
                if elem.kind().is_indirect() {
                    return None;
                }
                if let Some(method) = elem.own_method(name, Receiver::Pointer) {
                    return Some(MethodRef {
                        method,
                        path: Vec::new(),
                    });
                }
                let mut found = elem.lookup_method(name, depth + 1)?;
                found.path.insert(0, Step::Deref);
                Some(found)
            }
            Kind::Struct => self
                .fields()
                .iter()
                .enumerate()
                .filter(|(_, f)| f.is_embedded())
                .find_map(|(i, f)| {
                    let mut found = f.ty().lookup_method(name, depth + 1)?;
                    found.path.insert(0, Step::Field(i));
                    Some(found)
                }),
            _ => None,
        }
    }

    /// Returns a snapshot of the methods declared directly on this type.
    pub fn methods(&self) -> Vec<Method> {
        self.0.methods.borrow().clone()
    }

    /// Structural equality, ignoring names.
    fn same_layout(&self, other: &Type) -> bool {
        let (a, b) = (&self.0, &other.0);
        a.kind == b.kind
            && a.len == b.len
            && a.elem == b.elem
            && a.key == b.key
            && self.fields() == other.fields()
            && a.inputs == b.inputs
            && a.outputs == b.outputs
    }

    /// Returns true if values of `self` can be re-typed as `other`
    /// without changing their representation.
    pub(crate) fn convertible_to(&self, other: &Type) -> bool {
        self.same_layout(other)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        if self.0.kind != other.0.kind {
            return false;
        }
        if self.is_named() || other.is_named() {
            return self.0.name == other.0.name && self.0.pkg_path == other.0.pkg_path;
        }
        if self.0.kind == Kind::Interface {
            let (a, b) = (self.methods(), other.methods());
            return a.len() == b.len()
                && a.iter().zip(&b).all(|(x, y)| {
                    x.name == y.name && x.inputs == y.inputs && x.outputs == y.outputs
                });
        }
        self.same_layout(other)
    }
}

fn write_signature(f: &mut fmt::Formatter<'_>, inputs: &[Type], outputs: &[Type]) -> fmt::Result {
    write!(f, "(")?;
    for (i, t) in inputs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", t)?;
    }
    write!(f, ")")?;
    match outputs {
        [] => Ok(()),
        [single] => write!(f, " {}", single),
        many => {
            write!(f, " (")?;
            for (i, t) in many.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", t)?;
            }
            write!(f, ")")
        }
    }
}

fn write_opt(f: &mut fmt::Formatter<'_>, ty: Option<&Type>) -> fmt::Result {
    match ty {
        Some(t) => write!(f, "{}", t),
        None => f.write_str("?"),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_named() {
            let pkg = self.0.pkg_path.rsplit('/').next().unwrap_or_default();
            return if pkg.is_empty() {
                f.write_str(&self.0.name)
            } else {
                write!(f, "{}.{}", pkg, self.0.name)
            };
        }

        match self.0.kind {
            Kind::Array => {
                write!(f, "[{}]", self.0.len)?;
                write_opt(f, self.elem())
            }
            Kind::Slice => {
                write!(f, "[]")?;
                write_opt(f, self.elem())
            }
            Kind::Ptr => {
                write!(f, "*")?;
                write_opt(f, self.elem())
            }
            Kind::Chan => {
                write!(f, "chan ")?;
                write_opt(f, self.elem())
            }
            Kind::Map => {
                write!(f, "map[")?;
                write_opt(f, self.key())?;
                write!(f, "]")?;
                write_opt(f, self.elem())
            }
            Kind::Func => {
                write!(f, "func")?;
                write_signature(f, &self.0.inputs, &self.0.outputs)
            }
            Kind::Struct => {
                let fields = self.fields();
                if fields.is_empty() {
                    return write!(f, "struct {{}}");
                }
                write!(f, "struct {{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    if field.is_embedded() {
                        write!(f, "{}", field.ty())?;
                    } else {
                        write!(f, "{} {}", field.name(), field.ty())?;
                    }
                    if !field.tag().as_str().is_empty() {
                        write!(f, " {:?}", field.tag().as_str())?;
                    }
                }
                write!(f, " }}")
            }
            Kind::Interface => {
                let methods = self.methods();
                if methods.is_empty() {
                    return write!(f, "interface {{}}");
                }
                write!(f, "interface {{ ")?;
                for (i, m) in methods.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{:?}", m)?;
                }
                write!(f, " }}")
            }
            kind => f.write_str(kind.name()),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(Type::int().to_string(), "int");
        assert_eq!(Type::array_of(&Type::int(), 3).to_string(), "[3]int");
        assert_eq!(Type::slice_of(&Type::string()).to_string(), "[]string");
        assert_eq!(
            Type::map_of(&Type::string(), &Type::any()).to_string(),
            "map[string]interface {}"
        );

        let t = Type::structure("T", "github.com/go-test/deep", vec![]);
        assert_eq!(t.to_string(), "deep.T");
        assert_eq!(t.full_name(), "github.com/go-test/deep.T");
        assert_eq!(Type::pointer_to(&t).to_string(), "*deep.T");

        let anon = Type::anonymous_struct(vec![
            StructField::new("A", &Type::int()),
            StructField::new("b", &Type::string()).with_tag(r#"deep:"-""#),
        ]);
        assert_eq!(anon.to_string(), r#"struct { A int; b string "deep:\"-\"" }"#);
        assert_eq!(
            Type::func_of(vec![Type::int()], vec![Type::bool()]).to_string(),
            "func(int) bool"
        );
        assert_eq!(Type::error().to_string(), "error");
    }

    #[test]
    fn test_type_identity() {
        assert_eq!(Type::slice_of(&Type::int()), Type::slice_of(&Type::int()));
        assert_ne!(Type::slice_of(&Type::int()), Type::slice_of(&Type::int64()));
        assert_ne!(Type::array_of(&Type::int(), 2), Type::array_of(&Type::int(), 3));

        let t1 = Type::named("T1", "deep", &Type::int());
        let t2 = Type::named("T2", "deep", &Type::int());
        assert_ne!(t1, t2);
        assert_ne!(t1, Type::int());
        assert_eq!(t1, Type::named("T1", "deep", &Type::int()));

        let v1 = Type::structure("Error", "pkg/v1", vec![]);
        let v2 = Type::structure("Error", "pkg/v2", vec![]);
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_struct_tag_lookup() {
        let tag = StructTag::new(r#"json:"name,omitempty" deep:"-""#);
        assert_eq!(tag.get("json"), Some("name,omitempty"));
        assert_eq!(tag.get("deep"), Some("-"));
        assert_eq!(tag.get("yaml"), None);

        assert_eq!(StructTag::new("deep").get("deep"), None);
        assert_eq!(StructTag::new(r#"deep:"unterminated"#).get("deep"), None);
    }

    #[test]
    fn test_field_visibility() {
        let exported = StructField::new("Name", &Type::string());
        let hidden = StructField::new("id", &Type::int());
        let ignored = StructField::new("Cache", &Type::int()).with_tag(r#"deep:"-""#);
        assert!(exported.is_exported());
        assert!(!hidden.is_exported());
        assert!(ignored.is_ignored());
        assert!(!exported.is_ignored());
    }

    #[test]
    fn test_method_lookup_through_pointer_and_embedding() {
        let inner = Type::structure("Inner", "deep", vec![]);
        inner.add_method(Method::new("Equal", vec![inner.clone()], vec![Type::bool()], |_, _| {
            Vec::new()
        }));
        inner.add_method(
            Method::new("Error", vec![], vec![Type::string()], |_, _| Vec::new()).on_pointer(),
        );

        let outer = Type::structure("Outer", "deep", vec![StructField::embedded(&inner)]);

        let equal = outer.method_by_name("Equal").expect("promoted Equal");
        assert!(!equal.is_direct());
        assert_eq!(equal.method().inputs()[0], inner);

        assert!(inner.method_by_name("Error").is_none());
        let ptr = Type::pointer_to(&inner);
        assert!(ptr.method_by_name("Error").is_some_and(|m| m.is_direct()));
        assert!(ptr.method_by_name("Equal").is_some_and(|m| !m.is_direct()));
    }
}
