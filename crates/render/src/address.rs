//! Identity token formatting
//!
//! Handles (channels, functions, raw pointers) render as their identity
//! token. Real addresses change from run to run, so tests swap the default
//! hexadecimal form for a fixed token.

use crate::introspect::Identity;

/// Writes an identity token into the output buffer
pub trait AddressFormatter: Send + Sync {
    fn write_address(&self, buf: &mut String, identity: Identity);
}

/// `0x` followed by sixteen lowercase hex digits
#[derive(Debug, Clone, Copy, Default)]
pub struct HexAddress;

impl AddressFormatter for HexAddress {
    fn write_address(&self, buf: &mut String, identity: Identity) {
        buf.push_str(&format!("0x{:016x}", identity.0));
    }
}

/// The same token for every identity
#[derive(Debug, Clone)]
pub struct FixedToken(pub String);

impl AddressFormatter for FixedToken {
    fn write_address(&self, buf: &mut String, _identity: Identity) {
        buf.push_str(&self.0);
    }
}

impl<F> AddressFormatter for F
where
    F: Fn(Identity) -> String + Send + Sync,
{
    fn write_address(&self, buf: &mut String, identity: Identity) {
        buf.push_str(&self(identity));
    }
}
