//! Renderer configuration
//!
//! The only option is how identity tokens are written. Production output
//! uses hexadecimal addresses; tests and golden files use a fixed token so
//! the text does not change between runs.
//!
//! # Environment
//!
//! `DEEP_RENDER_ADDRESS` selects the address format for
//! [`RenderConfig::from_env`]:
//!
//! - `hex` (default): `0x000000c000012345`
//! - `token:<TEXT>`: every identity renders as `<TEXT>`

use crate::address::{AddressFormatter, FixedToken, HexAddress};
use crate::error::ConfigError;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Environment variable read by [`RenderConfig::from_env`]
pub const ADDRESS_ENV: &str = "DEEP_RENDER_ADDRESS";

/// Configuration for a [`Renderer`](crate::Renderer)
#[derive(Clone)]
pub struct RenderConfig {
    /// Formats identity tokens of handles
    pub address: Arc<dyn AddressFormatter>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            address: Arc::new(HexAddress),
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig").finish_non_exhaustive()
    }
}

impl RenderConfig {
    /// Render every identity as `token`
    pub fn with_address_token(token: impl Into<String>) -> Self {
        Self {
            address: Arc::new(FixedToken(token.into())),
        }
    }

    /// Render identities with a custom formatter
    pub fn with_address_formatter(formatter: impl AddressFormatter + 'static) -> Self {
        Self {
            address: Arc::new(formatter),
        }
    }

    /// Parse an address format: `hex` or `token:<TEXT>`
    pub fn parse_address(format: &str) -> Result<Self, ConfigError> {
        let format = format.trim();
        if format.eq_ignore_ascii_case("hex") {
            return Ok(Self::default());
        }
        match format.split_once(':') {
            Some((kind, token)) if kind.eq_ignore_ascii_case("token") && !token.is_empty() => {
                Ok(Self::with_address_token(token))
            }
            _ => Err(ConfigError::InvalidAddressFormat(format.to_string())),
        }
    }

    /// Load configuration from the environment, reporting invalid values
    pub fn try_from_env() -> Result<Self, ConfigError> {
        match std::env::var(ADDRESS_ENV) {
            Ok(format) => Self::parse_address(&format),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from the environment
    ///
    /// Invalid values fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring {}", ADDRESS_ENV);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::Identity;
    use serial_test::serial;

    fn address_of(config: &RenderConfig, id: usize) -> String {
        let mut buf = String::new();
        config.address.write_address(&mut buf, Identity(id));
        buf
    }

    /// Set or clear an environment variable
    ///
    /// # Safety
    /// Callers are `#[serial]`, so no other test touches the environment.
    unsafe fn set_env(key: &str, value: Option<&str>) {
        match value {
            Some(v) => unsafe { std::env::set_var(key, v) },
            None => unsafe { std::env::remove_var(key) },
        }
    }

    #[test]
    fn test_default_is_hex() {
        assert_eq!(address_of(&RenderConfig::default(), 255), "0x00000000000000ff");
    }

    #[test]
    fn test_parse_address() {
        let c = RenderConfig::parse_address("token:PTR").unwrap();
        assert_eq!(address_of(&c, 1), "PTR");

        let c = RenderConfig::parse_address(" HEX ").unwrap();
        assert_eq!(address_of(&c, 1), "0x0000000000000001");

        assert_eq!(
            RenderConfig::parse_address("token:").err(),
            Some(ConfigError::InvalidAddressFormat("token:".to_string()))
        );
        assert!(RenderConfig::parse_address("decimal").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_token() {
        let orig = std::env::var(ADDRESS_ENV).ok();
        // SAFETY: serialized with the other environment tests
        unsafe { set_env(ADDRESS_ENV, Some("token:ADDR")) };

        let config = RenderConfig::from_env();
        assert_eq!(address_of(&config, 42), "ADDR");

        unsafe { set_env(ADDRESS_ENV, orig.as_deref()) };
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_falls_back() {
        let orig = std::env::var(ADDRESS_ENV).ok();
        // SAFETY: serialized with the other environment tests
        unsafe { set_env(ADDRESS_ENV, Some("octal")) };

        assert!(RenderConfig::try_from_env().is_err());
        let config = RenderConfig::from_env();
        assert_eq!(address_of(&config, 16), "0x0000000000000010");

        unsafe { set_env(ADDRESS_ENV, orig.as_deref()) };
    }

    #[test]
    #[serial]
    fn test_from_env_unset() {
        let orig = std::env::var(ADDRESS_ENV).ok();
        // SAFETY: serialized with the other environment tests
        unsafe { set_env(ADDRESS_ENV, None) };

        let config = RenderConfig::try_from_env().unwrap();
        assert_eq!(address_of(&config, 16), "0x0000000000000010");

        unsafe { set_env(ADDRESS_ENV, orig.as_deref()) };
    }
}
