//! The introspection capability
//!
//! The renderer does not know how a host obtains type and shape information
//! from a live value. It consumes it through [`Introspect`]: a value reports
//! its static [`Type`] and a [`Shape`] whose sub-values are again
//! introspectable. Sub-values are returned by value, so implementations are
//! expected to be cheap handles (`Rc` clones, references).

use crate::error::IntrospectError;
use crate::types::Type;

/// Identity of a reference-shaped value
///
/// Stable for the lifetime of the referent; typically its address. Used both
/// for cycle detection and, through the address formatter, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity(pub usize);

impl Identity {
    /// Identity derived from the address of `value`
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Identity(value as *const T as *const () as usize)
    }
}

/// A non-nil reference: its identity plus what it refers to
#[derive(Debug, Clone)]
pub struct Reference<T> {
    pub identity: Identity,
    pub target: T,
}

impl<T> Reference<T> {
    pub fn new(identity: Identity, target: T) -> Self {
        Self { identity, target }
    }
}

/// Runtime shape of a value, with its sub-values
///
/// `None` in a reference-shaped variant means the reference is nil.
#[derive(Debug, Clone)]
pub enum Shape<V> {
    /// Untyped nil: no value at all
    Invalid,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
    String(String),
    Pointer(Option<Reference<V>>),
    /// Value whose static type is an interface; holds the dynamic value
    Interface(Option<V>),
    Slice(Option<Reference<Vec<V>>>),
    Array(Vec<V>),
    Map(Option<Reference<Vec<(V, V)>>>),
    Struct {
        fields: Vec<(String, V)>,
        /// Host-provided display text replacing the field list
        summary: Option<String>,
    },
    /// Channel, function or raw pointer: identity only
    Handle(Option<Identity>),
}

impl<V> Shape<V> {
    /// Identity this value owns for cycle tracking, if any
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Shape::Pointer(Some(r)) => Some(r.identity),
            Shape::Slice(Some(r)) => Some(r.identity),
            Shape::Map(Some(r)) => Some(r.identity),
            _ => None,
        }
    }
}

/// Capability to describe a value to the renderer
pub trait Introspect: Sized {
    /// Static declared type
    fn ty(&self) -> Type;

    /// Runtime shape and sub-values
    fn shape(&self) -> Result<Shape<Self>, IntrospectError>;
}
