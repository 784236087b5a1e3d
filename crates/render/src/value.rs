//! Dynamic value graph
//!
//! `Value` is a ready-made implementation of [`Introspect`] for callers that
//! build the data to render at runtime. Every value carries its static
//! [`Type`]. Reference-shaped parts (pointees, slice storage, map storage)
//! live in `Rc<RefCell<..>>` cells, so values can share structure and form
//! cycles; cloning a `Value` shares those cells rather than copying them.
//!
//! # Example
//!
//! ```rust
//! use deep_render::{Kind, Type, Value, Renderer, RenderConfig};
//!
//! let t = Type::named("main.Node", Kind::Struct);
//! let node = Value::cell(Value::record(t.clone(), vec![
//!     ("Name", Value::string("loop")),
//!     ("Next", Value::nil_pointer(t)),
//! ]));
//! let next = Value::pointer(&node);
//! node.borrow_mut().set_field("Next", next).unwrap();
//!
//! let renderer = Renderer::new(RenderConfig::with_address_token("PTR"));
//! assert_eq!(
//!     renderer.render(&Value::pointer(&node)),
//!     r#"(*main.Node){Name:"loop", Next:<REC(*main.Node)>}"#
//! );
//! ```

use crate::error::IntrospectError;
use crate::introspect::{Identity, Introspect, Reference, Shape};
use crate::render::render;
use crate::types::{Builtin, Kind, Type};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, mutable slot a pointer refers to
pub type Cell = Rc<RefCell<Value>>;

type Items = Rc<RefCell<Vec<Value>>>;
type Entries = Rc<RefCell<Vec<(Value, Value)>>>;

#[derive(Clone)]
enum Data {
    Invalid,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
    String(Rc<str>),
    Pointer(Option<Cell>),
    Interface(Option<Box<Value>>),
    Slice(Option<Items>),
    Array(Vec<Value>),
    Map(Option<Entries>),
    Struct {
        fields: Vec<(Rc<str>, Value)>,
        summary: Option<Rc<str>>,
    },
    // The allocation itself is the handle's identity
    Handle(Option<Rc<()>>),
}

/// A typed runtime value
#[derive(Clone)]
pub struct Value {
    ty: Type,
    data: Data,
}

fn identity_of<T: ?Sized>(rc: &Rc<T>) -> Identity {
    Identity(Rc::as_ptr(rc) as *const () as usize)
}

impl Value {
    fn new(ty: Type, data: Data) -> Self {
        Value { ty, data }
    }

    fn mismatch(&self, expected: &'static str) -> IntrospectError {
        IntrospectError::Mismatch {
            expected,
            found: self.ty.to_string(),
        }
    }

    fn borrowed(&self) -> IntrospectError {
        IntrospectError::Borrowed {
            type_name: self.ty.to_string(),
        }
    }

    /// Untyped nil
    pub fn nil() -> Self {
        Value::new(Type::any(), Data::Invalid)
    }

    pub fn bool(b: bool) -> Self {
        Value::new(Type::bool(), Data::Bool(b))
    }

    /// An `int`
    pub fn int(n: i64) -> Self {
        Value::new(Type::int(), Data::Int(n))
    }

    /// A signed integer of any declared type (`int8`, `render.myIntType`, ...)
    pub fn typed_int(ty: Type, n: i64) -> Self {
        Value::new(ty, Data::Int(n))
    }

    /// An unsigned integer of any declared type
    pub fn uint(ty: Type, n: u64) -> Self {
        Value::new(ty, Data::Uint(n))
    }

    /// A `float64`
    pub fn float(f: f64) -> Self {
        Value::new(Type::float64(), Data::Float(f))
    }

    /// A `float32`
    pub fn float32(f: f32) -> Self {
        Value::new(Type::builtin(Builtin::Float32), Data::Float(f as f64))
    }

    pub fn typed_float(ty: Type, f: f64) -> Self {
        Value::new(ty, Data::Float(f))
    }

    pub fn complex(ty: Type, re: f64, im: f64) -> Self {
        Value::new(ty, Data::Complex(re, im))
    }

    pub fn string(s: &str) -> Self {
        Value::new(Type::string(), Data::String(Rc::from(s)))
    }

    pub fn typed_string(ty: Type, s: &str) -> Self {
        Value::new(ty, Data::String(Rc::from(s)))
    }

    /// A `[]uint8`
    pub fn bytes(bytes: &[u8]) -> Self {
        let items = bytes
            .iter()
            .map(|b| Value::uint(Type::uint8(), *b as u64))
            .collect();
        Value::slice(Type::uint8(), items)
    }

    /// Wrap `value` in a fresh cell that pointers can share
    pub fn cell(value: Value) -> Cell {
        Rc::new(RefCell::new(value))
    }

    /// Pointer to an existing cell
    ///
    /// Reads the pointee's type, so the cell must not be mutably borrowed.
    pub fn pointer(cell: &Cell) -> Self {
        let elem = cell.borrow().ty.clone();
        Value::new(Type::pointer_to(elem), Data::Pointer(Some(Rc::clone(cell))))
    }

    /// Pointer to a fresh cell holding `value`
    pub fn pointer_to(value: Value) -> Self {
        Value::pointer(&Value::cell(value))
    }

    /// Nil pointer to `elem`
    pub fn nil_pointer(elem: Type) -> Self {
        Value::new(Type::pointer_to(elem), Data::Pointer(None))
    }

    /// `value` stored in an `any` slot
    pub fn any(value: Value) -> Self {
        Value::iface(Type::any(), value)
    }

    /// `value` stored in a slot of interface type `ty`
    pub fn iface(ty: Type, value: Value) -> Self {
        Value::new(ty, Data::Interface(Some(Box::new(value))))
    }

    /// Empty `any` slot
    pub fn nil_any() -> Self {
        Value::nil_iface(Type::any())
    }

    pub fn nil_iface(ty: Type) -> Self {
        Value::new(ty, Data::Interface(None))
    }

    /// `[]elem`
    pub fn slice(elem: Type, items: Vec<Value>) -> Self {
        Value::typed_slice(Type::slice_of(elem), items)
    }

    /// Slice of a declared slice type, e.g. `render.myStringSlice`
    pub fn typed_slice(ty: Type, items: Vec<Value>) -> Self {
        Value::new(ty, Data::Slice(Some(Rc::new(RefCell::new(items)))))
    }

    pub fn nil_slice(ty: Type) -> Self {
        Value::new(ty, Data::Slice(None))
    }

    /// `[N]elem`, N taken from `items`
    pub fn array(elem: Type, items: Vec<Value>) -> Self {
        Value::new(Type::array_of(items.len(), elem), Data::Array(items))
    }

    /// `map[key]value` holding `entries`; keys must be distinct
    pub fn map(key: Type, value: Type, entries: Vec<(Value, Value)>) -> Self {
        Value::typed_map(Type::map_of(key, value), entries)
    }

    pub fn typed_map(ty: Type, entries: Vec<(Value, Value)>) -> Self {
        Value::new(ty, Data::Map(Some(Rc::new(RefCell::new(entries)))))
    }

    pub fn nil_map(ty: Type) -> Self {
        Value::new(ty, Data::Map(None))
    }

    /// A record of declared type `ty`, fields in declaration order
    pub fn record<'a>(ty: Type, fields: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(name, value)| (Rc::from(name), value))
            .collect();
        Value::new(
            ty,
            Data::Struct {
                fields,
                summary: None,
            },
        )
    }

    /// An anonymous struct literal; its type is built from the fields
    pub fn anon_record<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        let fields: Vec<(&str, Value)> = fields.into_iter().collect();
        let ty = Type::anon_struct(fields.iter().map(|(name, v)| (*name, v.ty.clone())));
        Value::record(ty, fields)
    }

    /// A record rendered as `TypeName{summary}` instead of its fields
    ///
    /// For host types with a canonical display form, such as timestamps.
    /// The fields are still available to introspection.
    pub fn summarized<'a>(
        ty: Type,
        summary: &str,
        fields: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Self {
        let mut value = Value::record(ty, fields);
        if let Data::Struct { summary: s, .. } = &mut value.data {
            *s = Some(Rc::from(summary));
        }
        value
    }

    /// A fresh handle (channel, function, raw pointer) of type `ty`
    pub fn handle(ty: Type) -> Self {
        Value::new(ty, Data::Handle(Some(Rc::new(()))))
    }

    pub fn nil_handle(ty: Type) -> Self {
        Value::new(ty, Data::Handle(None))
    }

    /// A fresh `chan elem`
    pub fn chan(elem: Type) -> Self {
        Value::handle(Type::chan_of(elem))
    }

    pub fn nil_chan(elem: Type) -> Self {
        Value::nil_handle(Type::chan_of(elem))
    }

    /// Static declared type
    pub fn type_of(&self) -> &Type {
        &self.ty
    }

    /// Replace what a non-nil pointer points to
    pub fn set_pointee(&self, value: Value) -> Result<(), IntrospectError> {
        match &self.data {
            Data::Pointer(Some(cell)) => {
                *cell.try_borrow_mut().map_err(|_| self.borrowed())? = value;
                Ok(())
            }
            _ => Err(self.mismatch("non-nil pointer")),
        }
    }

    /// Append to a non-nil slice; visible through every clone
    pub fn push(&self, value: Value) -> Result<(), IntrospectError> {
        match &self.data {
            Data::Slice(Some(items)) => {
                items
                    .try_borrow_mut()
                    .map_err(|_| self.borrowed())?
                    .push(value);
                Ok(())
            }
            _ => Err(self.mismatch("non-nil slice")),
        }
    }

    /// Overwrite element `index` of an array or slice
    pub fn set_index(&mut self, index: usize, value: Value) -> Result<(), IntrospectError> {
        let type_name = self.ty.to_string();
        let out_of_range = |type_name: String| IntrospectError::Unsupported {
            type_name,
            reason: format!("index {} out of range", index),
        };
        match &mut self.data {
            Data::Array(items) => match items.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(out_of_range(type_name)),
            },
            Data::Slice(Some(items)) => {
                let mut items = match items.try_borrow_mut() {
                    Ok(items) => items,
                    Err(_) => return Err(IntrospectError::Borrowed { type_name }),
                };
                match items.get_mut(index) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(out_of_range(type_name)),
                }
            }
            _ => Err(IntrospectError::Mismatch {
                expected: "array or non-nil slice",
                found: type_name,
            }),
        }
    }

    /// Overwrite the record field called `name`
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), IntrospectError> {
        let type_name = self.ty.to_string();
        match &mut self.data {
            Data::Struct { fields, .. } => match fields.iter_mut().find(|(n, _)| &**n == name) {
                Some((_, slot)) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(IntrospectError::Unsupported {
                    type_name,
                    reason: format!("no field named {}", name),
                }),
            },
            _ => Err(IntrospectError::Mismatch {
                expected: "record",
                found: type_name,
            }),
        }
    }

    /// Insert into a non-nil map, replacing an entry with an equal key
    ///
    /// Keys are equal when they render identically with hexadecimal
    /// addresses, so distinct references stay distinct keys.
    pub fn insert(&self, key: Value, value: Value) -> Result<(), IntrospectError> {
        let Data::Map(Some(entries)) = &self.data else {
            return Err(self.mismatch("non-nil map"));
        };
        let key_text = render(&key);
        let existing = {
            let entries = entries.try_borrow().map_err(|_| self.borrowed())?;
            entries.iter().position(|(k, _)| render(k) == key_text)
        };
        let mut entries = entries.try_borrow_mut().map_err(|_| self.borrowed())?;
        match existing {
            Some(index) => entries[index] = (key, value),
            None => entries.push((key, value)),
        }
        Ok(())
    }

    /// Number of elements, entries or fields; 0 for scalars and nil
    pub fn len(&self) -> usize {
        match &self.data {
            Data::Slice(Some(items)) => items.borrow().len(),
            Data::Array(items) => items.len(),
            Data::Map(Some(entries)) => entries.borrow().len(),
            Data::Struct { fields, .. } => fields.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Introspect for Value {
    fn ty(&self) -> Type {
        self.ty.clone()
    }

    fn shape(&self) -> Result<Shape<Value>, IntrospectError> {
        let shape = match &self.data {
            Data::Invalid => Shape::Invalid,
            Data::Bool(b) => Shape::Bool(*b),
            Data::Int(n) => Shape::Int(*n),
            Data::Uint(n) => Shape::Uint(*n),
            Data::Float(f) => Shape::Float(*f),
            Data::Complex(re, im) => Shape::Complex(*re, *im),
            Data::String(s) => Shape::String(s.to_string()),
            Data::Pointer(None) => Shape::Pointer(None),
            Data::Pointer(Some(cell)) => {
                let target = cell.try_borrow().map_err(|_| self.borrowed())?.clone();
                Shape::Pointer(Some(Reference::new(identity_of(cell), target)))
            }
            Data::Interface(inner) => Shape::Interface(inner.as_deref().cloned()),
            Data::Slice(None) => Shape::Slice(None),
            Data::Slice(Some(items)) => {
                let target = items.try_borrow().map_err(|_| self.borrowed())?.clone();
                Shape::Slice(Some(Reference::new(identity_of(items), target)))
            }
            Data::Array(items) => Shape::Array(items.clone()),
            Data::Map(None) => Shape::Map(None),
            Data::Map(Some(entries)) => {
                let target = entries.try_borrow().map_err(|_| self.borrowed())?.clone();
                Shape::Map(Some(Reference::new(identity_of(entries), target)))
            }
            Data::Struct { fields, summary } => Shape::Struct {
                fields: fields
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect(),
                summary: summary.as_deref().map(str::to_string),
            },
            Data::Handle(handle) => {
                if !self.ty.kind().is_handle() {
                    return Err(IntrospectError::Unsupported {
                        type_name: self.ty.to_string(),
                        reason: "handle value of a non-handle type".to_string(),
                    });
                }
                Shape::Handle(handle.as_ref().map(identity_of))
            }
        };
        Ok(shape)
    }
}

/// Rendered form with hexadecimal addresses
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::uint(Type::uint8(), n as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` becomes an empty `any` slot
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Value::any(v.into()),
            None => Value::nil_any(),
        }
    }
}

/// Zero value of a scalar kind
fn zero_scalar(kind: Kind) -> Option<Data> {
    match kind {
        Kind::Bool => Some(Data::Bool(false)),
        Kind::Int => Some(Data::Int(0)),
        Kind::Uint | Kind::Uintptr => Some(Data::Uint(0)),
        Kind::Float32 | Kind::Float64 => Some(Data::Float(0.0)),
        Kind::Complex64 | Kind::Complex128 => Some(Data::Complex(0.0, 0.0)),
        Kind::String => Some(Data::String(Rc::from(""))),
        _ => None,
    }
}

impl Value {
    /// Zero value of `ty`
    ///
    /// Scalars are zero, references and interfaces are nil, arrays hold zero
    /// elements, anonymous structs hold zero fields. Named records have no
    /// known field list and come out empty.
    pub fn zero(ty: &Type) -> Self {
        if let Some(data) = zero_scalar(ty.kind()) {
            return Value::new(ty.clone(), data);
        }
        let data = match ty {
            Type::Array(len, elem) => Data::Array((0..*len).map(|_| Value::zero(elem)).collect()),
            Type::Struct(fields) => Data::Struct {
                fields: fields
                    .iter()
                    .map(|f| (Rc::from(f.name.as_str()), Value::zero(&f.ty)))
                    .collect(),
                summary: None,
            },
            _ => match ty.kind() {
                Kind::Pointer => Data::Pointer(None),
                Kind::Slice => Data::Slice(None),
                Kind::Map => Data::Map(None),
                Kind::Interface => Data::Interface(None),
                Kind::Chan | Kind::Func | Kind::UnsafePointer => Data::Handle(None),
                _ => Data::Struct {
                    fields: Vec::new(),
                    summary: None,
                },
            },
        };
        Value::new(ty.clone(), data)
    }
}
