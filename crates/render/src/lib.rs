//! deep-render: deterministic, cycle-safe value rendering
//!
//! Turns any introspectable value into a single line of verbose debug text:
//!
//! - Deterministic: map entries are sorted canonically, so equal values
//!   always render the same, whatever their insertion order.
//! - Cycle-safe: a reference met again on the path from the root renders as
//!   `<REC(Type)>` instead of recursing.
//!
//! Key pieces:
//! - [`Introspect`]: the capability a value implements to describe its type
//!   and shape; the renderer needs nothing else
//! - [`Value`]: a dynamic, shareable value graph implementing it
//! - [`Renderer`] / [`render`]: the traversal engine
//! - [`RenderConfig`]: how identity tokens of handles are written
//!
//! ```rust
//! use deep_render::{render, Type, Value};
//!
//! let m = Value::map(Type::string(), Type::bool(), vec![
//!     (Value::string("foo"), Value::bool(true)),
//!     (Value::string("bar"), Value::bool(false)),
//! ]);
//! assert_eq!(render(&m), r#"map[string]bool{"bar":false, "foo":true}"#);
//! ```

pub mod address;
pub mod compare;
pub mod config;
pub mod error;
pub mod float;
pub mod introspect;
#[cfg(feature = "json")]
pub mod json;
pub mod render;
pub mod types;
pub mod value;

pub use address::{AddressFormatter, FixedToken, HexAddress};
pub use config::{ADDRESS_ENV, RenderConfig};
pub use error::{ConfigError, IntrospectError};
pub use introspect::{Identity, Introspect, Reference, Shape};
pub use render::{Renderer, render};
pub use types::{Builtin, Field, Kind, Named, Signature, Type};
pub use value::{Cell, Value};
