//! JSON documents as an introspection backend
//!
//! Lets `serde_json` documents render canonically, with object keys in a
//! stable order regardless of how the map was built:
//!
//! ```rust
//! use deep_render::{render, json::Json};
//!
//! let doc = serde_json::json!({"b": [1, "x", null], "a": 2.5});
//! assert_eq!(
//!     render(&Json::new(&doc)),
//!     r#"map[string]any{"a":2.5, "b":[]any{1, "x", any(nil)}}"#
//! );
//! ```
//!
//! Type mapping: objects are `map[string]any`, arrays `[]any`, integers
//! `int64` or `uint64`, other numbers `float64`. Inside containers every
//! value sits in an `any` slot, so `null` there is `any(nil)`; a top-level
//! `null` is `nil`.

use crate::error::IntrospectError;
use crate::introspect::{Identity, Introspect, Reference, Shape};
use crate::types::Type;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy)]
enum Node<'a> {
    /// A value with its concrete type
    Value(&'a JsonValue),
    /// A value stored in an `any` slot of an array or object
    Slot(&'a JsonValue),
    /// An object key
    Key(&'a str),
}

/// Borrowed view of a JSON document implementing [`Introspect`]
#[derive(Debug, Clone, Copy)]
pub struct Json<'a>(Node<'a>);

impl<'a> Json<'a> {
    pub fn new(value: &'a JsonValue) -> Self {
        Json(Node::Value(value))
    }
}

fn concrete_type(value: &JsonValue) -> Type {
    match value {
        JsonValue::Null => Type::any(),
        JsonValue::Bool(_) => Type::bool(),
        JsonValue::Number(n) if n.is_i64() => Type::int64(),
        JsonValue::Number(n) if n.is_u64() => Type::uint64(),
        JsonValue::Number(_) => Type::float64(),
        JsonValue::String(_) => Type::string(),
        JsonValue::Array(_) => Type::slice_of(Type::any()),
        JsonValue::Object(_) => Type::map_of(Type::string(), Type::any()),
    }
}

impl<'a> Introspect for Json<'a> {
    fn ty(&self) -> Type {
        match self.0 {
            Node::Value(value) => concrete_type(value),
            Node::Slot(_) => Type::any(),
            Node::Key(_) => Type::string(),
        }
    }

    fn shape(&self) -> Result<Shape<Self>, IntrospectError> {
        let value = match self.0 {
            Node::Key(key) => return Ok(Shape::String(key.to_string())),
            Node::Slot(value) if value.is_null() => return Ok(Shape::Interface(None)),
            Node::Slot(value) => return Ok(Shape::Interface(Some(Json::new(value)))),
            Node::Value(value) => value,
        };

        let shape = match value {
            JsonValue::Null => Shape::Invalid,
            JsonValue::Bool(b) => Shape::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Shape::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Shape::Uint(u)
                } else {
                    let f = n.as_f64().ok_or_else(|| IntrospectError::Unsupported {
                        type_name: "float64".to_string(),
                        reason: format!("number {} is not representable", n),
                    })?;
                    Shape::Float(f)
                }
            }
            JsonValue::String(s) => Shape::String(s.clone()),
            JsonValue::Array(items) => Shape::Slice(Some(Reference::new(
                Identity::of(items),
                items.iter().map(|item| Json(Node::Slot(item))).collect(),
            ))),
            JsonValue::Object(map) => Shape::Map(Some(Reference::new(
                Identity::of(map),
                map.iter()
                    .map(|(k, v)| (Json(Node::Key(k)), Json(Node::Slot(v))))
                    .collect(),
            ))),
        };
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(render(&Json::new(&json!(null))), "nil");
        assert_eq!(render(&Json::new(&json!(true))), "true");
        assert_eq!(render(&Json::new(&json!(-3))), "-3");
        assert_eq!(render(&Json::new(&json!(u64::MAX))), "18446744073709551615");
        assert_eq!(render(&Json::new(&json!(1.5e-7))), "1.5e-07");
        assert_eq!(render(&Json::new(&json!("a\"b"))), r#""a\"b""#);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(render(&Json::new(&json!([]))), "[]any{}");
        assert_eq!(render(&Json::new(&json!({}))), "map[string]any{}");
    }

    #[test]
    fn test_nested_containers_carry_types() {
        let doc = json!({"list": [[1], {"k": null}], "n": 0});
        assert_eq!(
            render(&Json::new(&doc)),
            r#"map[string]any{"list":[]any{[]any{1}, map[string]any{"k":any(nil)}}, "n":0}"#
        );
    }

    #[test]
    fn test_key_order_is_bytewise() {
        let doc = json!({"b": 1, "B": 2, "a": 3, "": 4});
        assert_eq!(
            render(&Json::new(&doc)),
            r#"map[string]any{"":4, "B":2, "a":3, "b":1}"#
        );
    }
}
