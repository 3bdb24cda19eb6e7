// # IP Cache Trait
//
// Defines the interface for remembering the last address pushed to the
// provider.
//
// ## Purpose
//
// The cache is what makes repeated runs cheap: when the resolved address
// equals the cached one, no update request is sent. It holds exactly one
// string and is written only after the provider call completed.
//
// ## Implementations
//
// - Plain-text file: [`crate::cache::FileIpCache`]
// - In-memory: [`crate::cache::MemoryIpCache`]

use async_trait::async_trait;

/// Trait for last-known-IP caches
///
/// # Contract
///
/// - `read` on an empty or never-written cache returns `""`, not an error
/// - Values round-trip verbatim: no trimming, no parsing
/// - Local storage failures map to [`crate::Error::Io`]
#[async_trait]
pub trait IpCache: Send + Sync {
    /// Read the previously recorded IP, or `""` if none was recorded
    async fn read(&self) -> Result<String, crate::Error>;

    /// Replace the recorded IP
    async fn write(&self, ip: &str) -> Result<(), crate::Error>;
}
