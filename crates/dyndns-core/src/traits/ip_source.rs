// # IP Source Trait
//
// Defines the interface for discovering the host's public IP address.
//
// ## Implementations
//
// - HTTP IP-echo service: `dyndns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("public IP: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for public IP resolvers
///
/// A resolver answers one question per run: what address does the outside
/// world see for this host? The answer is returned as the raw text the
/// service produced (trimmed), without checking that it parses as an IP
/// address. The engine only ever compares it for equality with the cached
/// value and forwards it to the provider.
///
/// # Contract
///
/// - One lookup per call, no retry
/// - No caching between calls
/// - Transport failures map to [`crate::Error::Network`]
/// - Non-success answers map to [`crate::Error::Upstream`]
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public IP address
    async fn current(&self) -> Result<String, crate::Error>;

    /// Name of the source (for logging)
    fn source_name(&self) -> &'static str;
}
