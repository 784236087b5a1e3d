//! Error types
//!
//! Rendering itself never fails. These errors come from the two places
//! that can: the introspection capability describing a value, and the
//! environment-driven configuration.

/// Failure reported by an [`Introspect`](crate::Introspect) implementation
///
/// The renderer never propagates this to its caller; it renders an
/// `<unrenderable:TypeName>` placeholder for the failing branch instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntrospectError {
    /// A shared cell is mutably borrowed while being traversed
    Borrowed { type_name: String },
    /// A mutation helper was applied to a value of the wrong shape
    Mismatch {
        expected: &'static str,
        found: String,
    },
    /// The capability cannot describe this value at all
    Unsupported { type_name: String, reason: String },
}

impl std::fmt::Display for IntrospectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntrospectError::Borrowed { type_name } => {
                write!(f, "value of type {} is mutably borrowed", type_name)
            }
            IntrospectError::Mismatch { expected, found } => {
                write!(f, "expected a {} value, found {}", expected, found)
            }
            IntrospectError::Unsupported { type_name, reason } => {
                write!(f, "cannot introspect {}: {}", type_name, reason)
            }
        }
    }
}

impl std::error::Error for IntrospectError {}

/// Invalid renderer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `DEEP_RENDER_ADDRESS` holds something other than `hex` or `token:<TEXT>`
    InvalidAddressFormat(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidAddressFormat(value) => write!(
                f,
                "invalid address format {:?}: expected \"hex\" or \"token:<TEXT>\"",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
