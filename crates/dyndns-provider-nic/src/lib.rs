// # dyndns2 nic/update Provider
//
// This crate provides the DNS provider for the updater: the `nic/update`
// call spoken by Google Domains, DNS-O-Matic, IPv64 and most other dynamic
// DNS services.
//
// ## Request
//
// ```http
// POST https://<username>:<password>@<provider-host>/nic/update?hostname=<fqdn>&myip=<ip>
// Authorization: Basic <base64(username:password)>
// Content-Length: 0
// ```
//
// The credentials are part of the update URL as userinfo. On the wire they
// are sent as a Basic `Authorization` header, also when both are empty.
//
// ## Response Handling
//
// The answer (`good 1.2.3.4`, `nochg 1.2.3.4`, `badauth`, `911`, ...) is
// logged together with the status code and handed back as an
// `UpdateResult`. It is NOT turned into an error, whatever the status:
// only transport failures are errors.
//
// ## Security
//
// - The password never appears in logs: the logged request URL is redacted
// - No retry, no background tasks, no state between calls

use async_trait::async_trait;
use dyndns_core::config::{Credentials, Settings};
use dyndns_core::traits::{DnsProvider, UpdateResult};
use dyndns_core::{Error, Result};
use reqwest::Url;
use std::time::Duration;

/// Placeholder shown instead of the password in logged URLs
const REDACTED_PASSWORD: &str = "REDACTED";

/// dyndns2 `nic/update` provider
#[derive(Debug, Clone)]
pub struct NicUpdateProvider {
    /// Update endpoint without credentials or query
    update_url: String,

    /// HTTP client for update requests
    client: reqwest::Client,
}

impl NicUpdateProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `update_url`: endpoint, e.g. "https://domains.google.com/nic/update"
    /// - `timeout`: request timeout, `None` for the client defaults
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `update_url` is not an absolute URL that
    ///   can carry credentials
    pub fn new(update_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let update_url = update_url.into();

        let parsed = Url::parse(&update_url)
            .map_err(|e| Error::invalid_input(format!("Invalid update URL '{}': {}", update_url, e)))?;
        if parsed.cannot_be_a_base() || !parsed.has_host() {
            return Err(Error::invalid_input(format!(
                "Update URL '{}' has no host",
                update_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { update_url, client })
    }

    /// Create from runtime settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.update_url.clone(), settings.http_timeout())
    }

    /// Build the update URL for `credentials` and `ip`
    ///
    /// Credentials go into the userinfo, `hostname` and `myip` into the
    /// query; all parts are percent-encoded.
    pub fn update_url_for(&self, credentials: &Credentials, ip: &str) -> Result<Url> {
        let mut url = Url::parse(&self.update_url).map_err(|e| {
            Error::invalid_input(format!("Invalid update URL '{}': {}", self.update_url, e))
        })?;

        url.set_username(&credentials.username)
            .map_err(|_| Error::invalid_input("Update URL cannot carry a username"))?;
        url.set_password(Some(&credentials.password))
            .map_err(|_| Error::invalid_input("Update URL cannot carry a password"))?;

        url.query_pairs_mut()
            .append_pair("hostname", &credentials.fqdn)
            .append_pair("myip", ip);

        Ok(url)
    }
}

/// Copy of `url` that is safe to log
fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    if shown.password().is_some() && shown.set_password(Some(REDACTED_PASSWORD)).is_err() {
        return "<unprintable url>".to_string();
    }
    shown.to_string()
}

#[async_trait]
impl DnsProvider for NicUpdateProvider {
    async fn update_record(&self, credentials: &Credentials, new_ip: &str) -> Result<UpdateResult> {
        let url = self.update_url_for(credentials, new_ip)?;

        tracing::info!("request url: {}", redacted(&url));

        // Header built explicitly: empty userinfo would otherwise drop it
        let mut target = url;
        if target.set_password(None).is_err() || target.set_username("").is_err() {
            return Err(Error::invalid_input("Update URL cannot carry credentials"));
        }

        let response = self
            .client
            .post(target)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await
            .map_err(|e| {
                Error::network(format!(
                    "error updating Dynamic DNS record: {}",
                    e.without_url()
                ))
            })?;

        let status = response.status();
        tracing::info!("Dyn DNS responded with status code: {}", status.as_u16());

        let body = response.text().await.map_err(|e| {
            Error::network(format!(
                "error reading Dyn DNS response body: {}",
                e.without_url()
            ))
        })?;

        tracing::info!("Dyn DNS response body: {}", body);

        if !status.is_success() {
            tracing::warn!(
                "Dyn DNS update for {} was not accepted: {} - {}",
                credentials.fqdn,
                status,
                body.trim()
            );
        }

        Ok(UpdateResult::new(status.as_u16(), body))
    }

    fn provider_name(&self) -> &'static str {
        "nic-update"
    }
}
