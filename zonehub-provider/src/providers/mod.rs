//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "dnspod-legacy")]
mod dnspod_legacy;
#[cfg(feature = "dnspod-v3")]
mod dnspod_v3;

#[cfg(feature = "dnspod-legacy")]
pub use dnspod_legacy::{DnspodLegacyProvider, DnspodLegacyProviderBuilder};
#[cfg(feature = "dnspod-v3")]
pub use dnspod_v3::{DnspodV3Provider, DnspodV3ProviderBuilder};
