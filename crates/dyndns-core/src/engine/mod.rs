//! Core update engine
//!
//! The DdnsEngine runs one update pass:
//! - Loading the credentials file
//! - Resolving the public IP via IpSource
//! - Comparing it with the last value in IpCache
//! - Updating the record via DnsProvider when it differs
//! - Recording the new IP after the provider call completed
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │ Credentials │──▶│  IpSource   │──▶│  IpCache    │
//! │ (load)      │   │ (current)   │   │ (read)      │
//! └─────────────┘   └─────────────┘   └─────────────┘
//!                                            │
//!                                 equal ◀────┴────▶ different
//!                                   │                   │
//!                                   ▼                   ▼
//!                              Unchanged        ┌─────────────┐   ┌─────────────┐
//!                                               │ DnsProvider │──▶│  IpCache    │
//!                                               │ (update)    │   │ (write)     │
//!                                               └─────────────┘   └─────────────┘
//! ```
//!
//! The first failing step ends the run. In particular a failed provider call
//! leaves the cache untouched, so the next run sends the same update again.

use std::path::PathBuf;

use crate::config::Credentials;
use crate::error::Result;
use crate::traits::{DnsProvider, IpCache, IpSource, UpdateResult};
use tracing::{debug, error, info, warn};

/// How a completed run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Resolved IP equals the cached one; nothing was sent
    Unchanged {
        ip: String,
    },

    /// The provider was called and the cache now holds `new_ip`
    Updated {
        /// Cached value before the run (`None` if nothing was recorded)
        previous_ip: Option<String>,
        new_ip: String,
        /// What the provider answered, success or not
        response: UpdateResult,
    },
}

impl RunOutcome {
    /// Whether the provider was called
    pub fn is_updated(&self) -> bool {
        matches!(self, RunOutcome::Updated { .. })
    }
}

/// Single-shot update engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Call [`DdnsEngine::run_once()`]
/// 3. Drop
///
/// Every step is awaited before the next one starts; the engine never runs
/// two operations at once and never retries.
pub struct DdnsEngine {
    /// Path of the credentials file, read at the start of every run
    config_path: PathBuf,

    /// Public IP resolver
    ip_source: Box<dyn IpSource>,

    /// DNS provider for updating the record
    provider: Box<dyn DnsProvider>,

    /// Last-known-IP cache
    cache: Box<dyn IpCache>,
}

impl DdnsEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `config_path`: Credentials file
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `cache`: IP cache implementation
    pub fn new(
        config_path: impl Into<PathBuf>,
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        cache: Box<dyn IpCache>,
    ) -> Self {
        Self {
            config_path: config_path.into(),
            ip_source,
            provider,
            cache,
        }
    }

    /// Run one update pass
    ///
    /// Status lines are logged at `info` for every step. A failing step is
    /// logged at `error` with the step it belongs to and returned unchanged.
    ///
    /// # Returns
    ///
    /// - `Ok(RunOutcome::Unchanged)`: resolved IP equals the cached one
    /// - `Ok(RunOutcome::Updated)`: provider called, cache written
    /// - `Err(Error)`: the step that failed; later steps did not run
    pub async fn run_once(&self) -> Result<RunOutcome> {
        info!("grabbing config");
        let credentials = Credentials::load(&self.config_path)
            .await
            .inspect_err(|e| error!("could not retrieve config: {}", e))?;
        info!("grabbed config");
        debug!("Managing record: {}", credentials.fqdn);

        info!(
            "retrieving public IP address (source: {})",
            self.ip_source.source_name()
        );
        let ip = self
            .ip_source
            .current()
            .await
            .inspect_err(|e| error!("could not retrieve public IP: {}", e))?;
        info!("retrieved public IP address: {}", ip);

        let previous_ip = self.cache.read().await.inspect_err(|e| {
            error!("could not retrieve previous public IP from file: {}", e)
        })?;

        if previous_ip == ip {
            info!(
                "current public ip and previous public ip are identical: ({} = {})",
                previous_ip, ip
            );
            return Ok(RunOutcome::Unchanged { ip });
        }

        info!(
            "updating Dynamic DNS via {}",
            self.provider.provider_name()
        );
        let response = self
            .provider
            .update_record(&credentials, &ip)
            .await
            .inspect_err(|e| error!("updating dynamic DNS failed: {}", e))?;

        // Non-success answers still count as a completed update
        if !response.is_success() {
            warn!(
                "Dynamic DNS answered with status {}; recording IP anyway",
                response.status
            );
        }
        info!("updated Dynamic DNS");

        info!("recording IP address to local file");
        self.cache
            .write(&ip)
            .await
            .inspect_err(|e| error!("could not record public IP: {}", e))?;
        info!("recorded IP address to local file");

        Ok(RunOutcome::Updated {
            previous_ip: (!previous_ip.is_empty()).then_some(previous_ip),
            new_ip: ip,
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_outcome_is_updated() {
        let unchanged = RunOutcome::Unchanged {
            ip: "1.2.3.4".to_string(),
        };
        let updated = RunOutcome::Updated {
            previous_ip: None,
            new_ip: "1.2.3.4".to_string(),
            response: UpdateResult::new(200, "good 1.2.3.4"),
        };

        assert!(!unchanged.is_updated());
        assert!(updated.is_updated());
        assert_eq!(updated.clone(), updated);
    }
}
