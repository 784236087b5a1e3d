//! Traversal engine and shape formatters
//!
//! Renders any [`Introspect`] value to a single line of text:
//!
//! - Scalars: `123`, `3.14`, `(3+0.14i)`, `"hello"`; declared scalar types
//!   are wrapped: `render.myIntType(12)`
//! - Pointers: `(*string)("x")`, `(*render.T){...}`, `(**render.T)(nil)`
//! - Slices and arrays: `[]string{"a", "b"}`, `[3]int{1, 2, 3}`,
//!   `[]uint8(nil)`
//! - Maps: `map[string]bool{"bar":false, "foo":true}`, keys in canonical
//!   order
//! - Records: `render.T{Name:"foo", I:any(nil)}`; anonymous structs drop
//!   field names: `struct { a int; b string }{123, "foo"}`
//! - Handles: `(chan int)(0x000000c000012345)`
//!
//! Inside an unnamed composite the element type is implied and its prefix is
//! elided: `[]struct { a int; b int }{{1, 2}}`.
//!
//! Reference-shaped values (pointers, slices, maps) are tracked on the active
//! path; re-entering one renders `<REC(Type)>` instead of descending.

use crate::address::AddressFormatter;
use crate::compare::compare_keys;
use crate::config::RenderConfig;
use crate::float::{Width, format_complex, format_float};
use crate::introspect::{Identity, Introspect, Shape};
use crate::types::{Kind, Type};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Renders values with a fixed configuration
///
/// Cheap to clone and safe to share between threads; each call to
/// [`Renderer::render`] keeps its own visited-set.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `value` to its canonical text
    pub fn render<V: Introspect>(&self, value: &V) -> String {
        let mut traversal = Traversal {
            address: self.config.address.as_ref(),
            visited: HashSet::new(),
        };
        let mut buf = String::new();
        traversal.render(&mut buf, 0, value, false);
        trace!(len = buf.len(), "rendered value");
        buf
    }
}

/// Render `value` with the default configuration (hexadecimal addresses)
pub fn render<V: Introspect>(value: &V) -> String {
    Renderer::default().render(value)
}

/// State of one top-level render call
struct Traversal<'a> {
    address: &'a dyn AddressFormatter,
    /// Identities of the reference-shaped values on the active path
    visited: HashSet<Identity>,
}

/// Whether a slot of type `ty` inside an unnamed composite can omit its type
///
/// Unnamed types and declared scalars are implied by the enclosing literal;
/// interfaces never are, since the dynamic type is what matters.
fn is_implied(ty: &Type) -> bool {
    if ty.is_named() && !ty.kind().is_scalar() {
        return false;
    }
    ty.kind() != Kind::Interface
}

fn width(ty: &Type) -> Width {
    match ty.kind() {
        Kind::Float32 | Kind::Complex64 => Width::F32,
        _ => Width::F64,
    }
}

/// Write the type prefix with `ptrs` levels of indirection
///
/// Pointer levels and handle types are parenthesized: `(**T)`,
/// `(chan int)`.
fn write_type(buf: &mut String, ptrs: usize, ty: &Type) {
    let parens = ptrs > 0 || ty.kind().is_handle();
    if parens {
        buf.push('(');
        for _ in 0..ptrs {
            buf.push('*');
        }
    }

    match ty {
        Type::Pointer(elem) => {
            // Levels already counted in `ptrs` were written above
            if ptrs == 0 {
                buf.push('*');
            }
            write_type(buf, 0, elem);
        }
        Type::Array(len, elem) => {
            buf.push('[');
            buf.push_str(&len.to_string());
            buf.push(']');
            write_type(buf, 0, elem);
        }
        Type::Slice(elem) => {
            buf.push_str("[]");
            write_type(buf, 0, elem);
        }
        Type::Map(key, value) => {
            buf.push_str("map[");
            write_type(buf, 0, key);
            buf.push(']');
            write_type(buf, 0, value);
        }
        other => buf.push_str(&other.to_string()),
    }

    if parens {
        buf.push(')');
    }
}

/// Double-quoted with escapes for quotes, backslashes and non-printables
fn quote(s: &str, buf: &mut String) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\x07' => buf.push_str("\\a"),
            '\x08' => buf.push_str("\\b"),
            '\x0C' => buf.push_str("\\f"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\x0B' => buf.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                buf.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => {
                buf.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => buf.push(c),
        }
    }
    buf.push('"');
}

impl Traversal<'_> {
    /// Render one value
    ///
    /// `ptrs` counts pointer levels dereferenced to reach it, which become
    /// part of its type prefix. `implicit` is set when an enclosing unnamed
    /// composite already implies the type.
    fn render<V: Introspect>(&mut self, buf: &mut String, ptrs: usize, value: &V, implicit: bool) {
        let ty = value.ty();
        let shape = match value.shape() {
            Ok(shape) => shape,
            Err(e) => {
                warn!(type_name = %ty, error = %e, "cannot introspect value");
                buf.push_str("<unrenderable:");
                buf.push_str(&ty.to_string());
                buf.push('>');
                return;
            }
        };

        let identity = shape.identity();
        if let Some(id) = identity
            && !self.visited.insert(id)
        {
            debug!(type_name = %ty, "recursive reference");
            buf.push_str("<REC(");
            if !implicit {
                write_type(buf, ptrs, &ty);
            }
            buf.push_str(")>");
            return;
        }

        self.format(buf, ptrs, &ty, shape, implicit);

        if let Some(id) = identity {
            self.visited.remove(&id);
        }
    }

    fn format<V: Introspect>(
        &mut self,
        buf: &mut String,
        ptrs: usize,
        ty: &Type,
        shape: Shape<V>,
        implicit: bool,
    ) {
        match shape {
            Shape::Invalid => buf.push_str("nil"),

            Shape::Struct { fields, summary } => {
                if !implicit {
                    write_type(buf, ptrs, ty);
                }
                buf.push('{');
                match summary {
                    Some(summary) => buf.push_str(&summary),
                    None => self.format_fields(buf, ty, &fields),
                }
                buf.push('}');
            }

            Shape::Slice(None) => {
                if implicit {
                    buf.push_str("nil");
                } else {
                    write_type(buf, ptrs, ty);
                    buf.push_str("(nil)");
                }
            }
            Shape::Slice(Some(items)) => {
                self.format_elements(buf, ptrs, ty, &items.target, implicit)
            }
            Shape::Array(items) => self.format_elements(buf, ptrs, ty, &items, implicit),

            Shape::Map(None) => {
                if implicit {
                    buf.push_str("nil");
                } else {
                    write_type(buf, ptrs, ty);
                    buf.push_str("(nil)");
                }
            }
            Shape::Map(Some(entries)) => {
                if !implicit {
                    write_type(buf, ptrs, ty);
                }
                self.format_entries(buf, ty, entries.target);
            }

            Shape::Pointer(Some(target)) => self.render(buf, ptrs + 1, &target.target, false),
            Shape::Pointer(None) => {
                // A declared pointer type names its own indirection
                let ptrs = match ty {
                    Type::Pointer(_) => ptrs + 1,
                    _ => ptrs,
                };
                write_type(buf, ptrs, ty);
                buf.push_str("(nil)");
            }

            Shape::Interface(inner) => match inner {
                Some(inner) => self.render(buf, ptrs, &inner, false),
                None => {
                    write_type(buf, ptrs, ty);
                    buf.push_str("(nil)");
                }
            },

            Shape::Handle(identity) => {
                write_type(buf, ptrs, ty);
                buf.push('(');
                self.address
                    .write_address(buf, identity.unwrap_or(Identity(0)));
                buf.push(')');
            }

            scalar => {
                let implicit = implicit || (ptrs == 0 && ty.is_builtin());
                if !implicit {
                    write_type(buf, ptrs, ty);
                    buf.push('(');
                }
                match scalar {
                    Shape::Bool(b) => buf.push_str(if b { "true" } else { "false" }),
                    Shape::Int(n) => buf.push_str(&n.to_string()),
                    Shape::Uint(n) => buf.push_str(&n.to_string()),
                    Shape::Float(f) => format_float(f, width(ty), buf),
                    Shape::Complex(re, im) => format_complex(re, im, width(ty), buf),
                    Shape::String(s) => quote(&s, buf),
                    _ => {}
                }
                if !implicit {
                    buf.push(')');
                }
            }
        }
    }

    fn format_fields<V: Introspect>(&mut self, buf: &mut String, ty: &Type, fields: &[(String, V)]) {
        for (i, (name, field)) in fields.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            // Only anonymous structs imply their field types
            let implied = match ty {
                Type::Struct(declared) => match declared.get(i) {
                    Some(decl) => is_implied(&decl.ty),
                    None => is_implied(&field.ty()),
                },
                _ => false,
            };
            if !implied {
                buf.push_str(name);
                buf.push(':');
            }
            self.render(buf, 0, field, implied);
        }
    }

    fn format_elements<V: Introspect>(
        &mut self,
        buf: &mut String,
        ptrs: usize,
        ty: &Type,
        items: &[V],
        implicit: bool,
    ) {
        if !implicit {
            write_type(buf, ptrs, ty);
        }
        let implied = match ty {
            Type::Slice(elem) | Type::Array(_, elem) => is_implied(elem),
            _ => false,
        };
        buf.push('{');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.render(buf, 0, item, implied);
        }
        buf.push('}');
    }

    fn format_entries<V: Introspect>(&mut self, buf: &mut String, ty: &Type, entries: Vec<(V, V)>) {
        let (key_implied, value_implied) = match ty {
            Type::Map(key, value) => (is_implied(key), is_implied(value)),
            _ => (
                entries.first().is_some_and(|(k, _)| is_implied(&k.ty())),
                false,
            ),
        };

        let mut entries: Vec<(V, V, String)> = entries
            .into_iter()
            .map(|(key, value)| {
                let mut text = String::new();
                self.render(&mut text, 0, &key, key_implied);
                (key, value, text)
            })
            .collect();
        entries.sort_by(|a, b| compare_keys(&a.0, &b.0).then_with(|| a.2.cmp(&b.2)));

        buf.push('{');
        for (i, (_, value, key_text)) in entries.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            buf.push_str(key_text);
            buf.push(':');
            self.render(buf, 0, value, value_implied);
        }
        buf.push('}');
    }
}
