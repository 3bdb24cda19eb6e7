// # Memory IP Cache
//
// In-memory implementation of IpCache.
//
// ## Purpose
//
// Keeps the last-known IP for the lifetime of the value only. Useful when
// embedding the engine in a process that runs several updates, and in tests.
//
// ## Crash Behavior
//
// Nothing survives a restart: the first run afterwards always sends an
// update.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::ip_cache::IpCache;

/// In-memory last-known-IP cache
///
/// Clones share the same slot.
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::cache::MemoryIpCache;
/// use dyndns_core::traits::IpCache;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = MemoryIpCache::new();
///     assert_eq!(cache.read().await?, "");
///
///     cache.write("1.2.3.4").await?;
///     assert_eq!(cache.read().await?, "1.2.3.4");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryIpCache {
    inner: Arc<RwLock<Option<String>>>,
}

impl MemoryIpCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache that already holds `ip`
    pub fn with_ip(ip: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(ip.into()))),
        }
    }

    /// Whether anything was ever written
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_none()
    }

    /// Forget the recorded IP
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

#[async_trait]
impl IpCache for MemoryIpCache {
    async fn read(&self) -> Result<String, Error> {
        Ok(self.inner.read().await.clone().unwrap_or_default())
    }

    async fn write(&self, ip: &str) -> Result<(), Error> {
        *self.inner.write().await = Some(ip.to_string());
        Ok(())
    }
}
