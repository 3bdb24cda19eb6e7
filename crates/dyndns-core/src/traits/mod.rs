//! Core traits for the updater
//!
//! One trait per workflow step that touches the outside world:
//!
//! - [`IpSource`]: discover the public IP address
//! - [`IpCache`]: remember the last address sent to the provider
//! - [`DnsProvider`]: push a new address to the provider

pub mod ip_source;
pub mod dns_provider;
pub mod ip_cache;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, UpdateResult};
pub use ip_cache::IpCache;
