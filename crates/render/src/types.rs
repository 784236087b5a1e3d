//! Declared type descriptors
//!
//! A [`Type`] is the static type the introspection capability reports for a
//! value. The renderer uses it for two things: the type-name prefix in the
//! output, and deciding when that prefix is implied by an enclosing unnamed
//! composite and can be elided.
//!
//! Named types carry only their qualified name and underlying [`Kind`], never
//! their structure. That keeps self-referential types (`type Node struct {
//! next *Node }`) finite; a named record's field names come from its values.
//!
//! `Display` prints the declared form, e.g. `map[string][]int`,
//! `struct { a int; b string }`, `func(int) string`.

use std::fmt;
use std::rc::Rc;

/// Underlying category of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    Pointer,
    Slice,
    Array,
    Map,
    Struct,
    Interface,
    Chan,
    Func,
}

impl Kind {
    /// Scalar kinds whose values print as a bare literal
    ///
    /// Named types of these kinds may still have their prefix elided inside
    /// an unnamed composite, just like the builtin types themselves.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Kind::Bool
                | Kind::Int
                | Kind::Uint
                | Kind::Uintptr
                | Kind::Float32
                | Kind::Float64
                | Kind::Complex64
                | Kind::Complex128
                | Kind::String
        )
    }

    /// Kinds rendered as an opaque identity token
    pub fn is_handle(self) -> bool {
        matches!(self, Kind::Chan | Kind::Func | Kind::UnsafePointer)
    }
}

/// Predeclared types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
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
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Bool => "bool",
            Builtin::Int => "int",
            Builtin::Int8 => "int8",
            Builtin::Int16 => "int16",
            Builtin::Int32 => "int32",
            Builtin::Int64 => "int64",
            Builtin::Uint => "uint",
            Builtin::Uint8 => "uint8",
            Builtin::Uint16 => "uint16",
            Builtin::Uint32 => "uint32",
            Builtin::Uint64 => "uint64",
            Builtin::Uintptr => "uintptr",
            Builtin::Float32 => "float32",
            Builtin::Float64 => "float64",
            Builtin::Complex64 => "complex64",
            Builtin::Complex128 => "complex128",
            Builtin::String => "string",
            Builtin::UnsafePointer => "unsafe.Pointer",
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            Builtin::Bool => Kind::Bool,
            Builtin::Int | Builtin::Int8 | Builtin::Int16 | Builtin::Int32 | Builtin::Int64 => {
                Kind::Int
            }
            Builtin::Uint
            | Builtin::Uint8
            | Builtin::Uint16
            | Builtin::Uint32
            | Builtin::Uint64 => Kind::Uint,
            Builtin::Uintptr => Kind::Uintptr,
            Builtin::Float32 => Kind::Float32,
            Builtin::Float64 => Kind::Float64,
            Builtin::Complex64 => Kind::Complex64,
            Builtin::Complex128 => Kind::Complex128,
            Builtin::String => Kind::String,
            Builtin::UnsafePointer => Kind::UnsafePointer,
        }
    }
}

/// A named (declared) type: qualified name plus underlying kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Named {
    pub name: String,
    pub kind: Kind,
}

/// Field of an anonymous struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: Type,
}

/// Function signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<Type>,
    pub results: Vec<Type>,
}

/// Static declared type of a value
///
/// Cloning is cheap: composite descriptors share their parts through `Rc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Builtin(Builtin),
    Named(Rc<Named>),
    Pointer(Rc<Type>),
    Slice(Rc<Type>),
    Array(usize, Rc<Type>),
    Map(Rc<Type>, Rc<Type>),
    /// Anonymous struct literal type
    Struct(Rc<[Field]>),
    /// `None` is the empty interface, printed `any`
    Interface(Option<Rc<str>>),
    Chan(Rc<Type>),
    Func(Rc<Signature>),
}

impl Type {
    pub fn builtin(b: Builtin) -> Self {
        Type::Builtin(b)
    }

    pub fn bool() -> Self {
        Type::Builtin(Builtin::Bool)
    }

    pub fn int() -> Self {
        Type::Builtin(Builtin::Int)
    }

    pub fn int64() -> Self {
        Type::Builtin(Builtin::Int64)
    }

    pub fn uint8() -> Self {
        Type::Builtin(Builtin::Uint8)
    }

    pub fn uint64() -> Self {
        Type::Builtin(Builtin::Uint64)
    }

    pub fn float64() -> Self {
        Type::Builtin(Builtin::Float64)
    }

    pub fn string() -> Self {
        Type::Builtin(Builtin::String)
    }

    /// A declared type, e.g. `Type::named("render.myIntType", Kind::Int)`
    pub fn named(name: impl Into<String>, kind: Kind) -> Self {
        Type::Named(Rc::new(Named {
            name: name.into(),
            kind,
        }))
    }

    pub fn pointer_to(elem: Type) -> Self {
        Type::Pointer(Rc::new(elem))
    }

    pub fn slice_of(elem: Type) -> Self {
        Type::Slice(Rc::new(elem))
    }

    pub fn array_of(len: usize, elem: Type) -> Self {
        Type::Array(len, Rc::new(elem))
    }

    pub fn map_of(key: Type, value: Type) -> Self {
        Type::Map(Rc::new(key), Rc::new(value))
    }

    /// An anonymous struct type with the given fields in declaration order
    pub fn anon_struct<N: Into<String>>(fields: impl IntoIterator<Item = (N, Type)>) -> Self {
        let fields: Vec<Field> = fields
            .into_iter()
            .map(|(name, ty)| Field {
                name: name.into(),
                ty,
            })
            .collect();
        Type::Struct(fields.into())
    }

    /// The empty interface
    pub fn any() -> Self {
        Type::Interface(None)
    }

    /// A named interface type, e.g. `fmt.Stringer`
    pub fn interface(name: &str) -> Self {
        Type::Interface(Some(Rc::from(name)))
    }

    pub fn chan_of(elem: Type) -> Self {
        Type::Chan(Rc::new(elem))
    }

    pub fn func(params: Vec<Type>, results: Vec<Type>) -> Self {
        Type::Func(Rc::new(Signature { params, results }))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Type::Builtin(b) => b.kind(),
            Type::Named(n) => n.kind,
            Type::Pointer(_) => Kind::Pointer,
            Type::Slice(_) => Kind::Slice,
            Type::Array(..) => Kind::Array,
            Type::Map(..) => Kind::Map,
            Type::Struct(_) => Kind::Struct,
            Type::Interface(_) => Kind::Interface,
            Type::Chan(_) => Kind::Chan,
            Type::Func(_) => Kind::Func,
        }
    }

    /// True for declared types and named interfaces
    ///
    /// Builtins count as unnamed: their name is their structure.
    pub fn is_named(&self) -> bool {
        matches!(self, Type::Named(_) | Type::Interface(Some(_)))
    }

    /// True for the predeclared scalar types (`int`, `string`, ...)
    pub fn is_builtin(&self) -> bool {
        matches!(self, Type::Builtin(_))
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Builtin(b) => f.write_str(b.name()),
            Type::Named(n) => f.write_str(&n.name),
            Type::Pointer(elem) => write!(f, "*{}", elem),
            Type::Slice(elem) => write!(f, "[]{}", elem),
            Type::Array(len, elem) => write!(f, "[{}]{}", len, elem),
            Type::Map(key, value) => write!(f, "map[{}]{}", key, value),
            Type::Struct(fields) if fields.is_empty() => f.write_str("struct {}"),
            Type::Struct(fields) => {
                f.write_str("struct { ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                f.write_str(" }")
            }
            Type::Interface(Some(name)) => f.write_str(name),
            Type::Interface(None) => f.write_str("any"),
            Type::Chan(elem) => write!(f, "chan {}", elem),
            Type::Func(sig) => {
                f.write_str("func(")?;
                write_list(f, &sig.params)?;
                f.write_str(")")?;
                match sig.results.as_slice() {
                    [] => Ok(()),
                    [single] => write!(f, " {}", single),
                    many => {
                        f.write_str(" (")?;
                        write_list(f, many)?;
                        f.write_str(")")
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        assert_eq!(Type::uint8().to_string(), "uint8");
        assert_eq!(Type::builtin(Builtin::Complex64).to_string(), "complex64");
        assert_eq!(
            Type::builtin(Builtin::UnsafePointer).to_string(),
            "unsafe.Pointer"
        );
    }

    #[test]
    fn test_composite_names() {
        let t = Type::map_of(Type::string(), Type::slice_of(Type::int()));
        assert_eq!(t.to_string(), "map[string][]int");

        let t = Type::pointer_to(Type::array_of(2, Type::any()));
        assert_eq!(t.to_string(), "*[2]any");

        let t = Type::slice_of(Type::pointer_to(Type::named("render.T", Kind::Struct)));
        assert_eq!(t.to_string(), "[]*render.T");
    }

    #[test]
    fn test_anon_struct_names() {
        let t = Type::anon_struct([("a", Type::int()), ("b", Type::string())]);
        assert_eq!(t.to_string(), "struct { a int; b string }");

        let empty = Type::anon_struct(Vec::<(String, Type)>::new());
        assert_eq!(empty.to_string(), "struct {}");
    }

    #[test]
    fn test_func_and_chan_names() {
        assert_eq!(Type::chan_of(Type::int()).to_string(), "chan int");
        assert_eq!(Type::func(vec![], vec![]).to_string(), "func()");
        assert_eq!(
            Type::func(vec![Type::int()], vec![Type::string()]).to_string(),
            "func(int) string"
        );
        assert_eq!(
            Type::func(
                vec![Type::int(), Type::bool()],
                vec![Type::string(), Type::interface("error")]
            )
            .to_string(),
            "func(int, bool) (string, error)"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Type::named("render.myIntType", Kind::Int).kind(), Kind::Int);
        assert!(Type::named("render.myIntType", Kind::Int).is_named());
        assert!(!Type::int().is_named());
        assert!(Type::interface("fmt.Stringer").is_named());
        assert!(!Type::any().is_named());
        assert!(Kind::String.is_scalar());
        assert!(!Kind::UnsafePointer.is_scalar());
        assert!(Kind::Func.is_handle());
    }
}
