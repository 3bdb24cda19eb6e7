// # DNS Provider Trait
//
// Defines the interface for pushing a new address to a dynamic DNS provider.
//
// ## Implementations
//
// - dyndns2 `nic/update`: `dyndns-provider-nic` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::{Credentials, DnsProvider};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//     let credentials = Credentials::new("user", "pass", "host.example.com");
//
//     let result = provider.update_record(&credentials, "203.0.113.7").await?;
//     println!("provider answered {}", result.status);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::config::Credentials;

/// What the provider answered to an update request
///
/// The response is recorded, not interpreted. A non-success status is still
/// a completed call: the engine logs it and carries on writing the cache.
/// Callers that want stricter handling can check [`UpdateResult::is_success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    /// HTTP status code of the response
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl UpdateResult {
    /// Create a new update result
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the provider answered with a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for DNS provider implementations
///
/// # Contract
///
/// - Exactly one request per call, no retry
/// - No state kept between calls
/// - Transport failures (request not sent, body not read) map to
///   [`crate::Error::Network`]
/// - Any HTTP status, success or not, is returned as `Ok(UpdateResult)`
/// - The password never appears in logs or error messages
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Point `credentials.fqdn` at `new_ip`
    async fn update_record(
        &self,
        credentials: &Credentials,
        new_ip: &str,
    ) -> Result<UpdateResult, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
