// # HTTP IP Source
//
// This crate provides the public-IP resolver for the updater: one GET
// against an IP-echo service that answers with the caller's address as
// plain text.
//
// ## Request
//
// ```http
// GET <url>?format=text
// ```
//
// The `format` parameter is understood by several echo services and ignored
// by the rest; it is left out entirely when configured empty.
//
// ## Response Handling
//
// - Request not sent / body not read → `Error::Network`
// - Non-2xx status → `Error::Upstream`
// - 2xx → body trimmed of surrounding whitespace, returned as-is (not parsed)

use async_trait::async_trait;
use dyndns_core::config::Settings;
use dyndns_core::traits::IpSource;
use dyndns_core::{Error, Result};

use std::time::Duration;

/// Public IP resolver backed by an HTTP IP-echo service
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// Value of the `format` query parameter (empty = not sent)
    format: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://domains.google.com/checkip")
    /// - `format`: value of the `format` query parameter, `""` to omit it
    /// - `timeout`: request timeout, `None` for the client defaults
    pub fn new(
        url: impl Into<String>,
        format: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            format: format.into(),
            client,
        })
    }

    /// Create from runtime settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.ip_service_url.clone(),
            settings.ip_service_format.clone(),
            settings.http_timeout(),
        )
    }

    /// URL the source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<String> {
        let mut request = self.client.get(&self.url);
        if !self.format.is_empty() {
            request = request.query(&[("format", self.format.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::network(format!("error getting public IP: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(format!(
                "{} responded with non-success status code: {}",
                self.url, status
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::network(format!("error reading {} response body: {}", self.url, e))
        })?;

        let ip = body.trim();
        tracing::debug!("IP service {} answered {:?}", self.url, ip);

        Ok(ip.to_string())
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        self.fetch_ip().await
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_settings() {
        let source = HttpIpSource::from_settings(&Settings::default()).unwrap();

        assert_eq!(source.url(), "https://domains.google.com/checkip");
        assert_eq!(source.format, "text");
        assert_eq!(source.source_name(), "http");
    }

    #[test]
    fn test_with_timeout() {
        let source = HttpIpSource::new(
            "https://api.ipify.org",
            "",
            Some(Duration::from_secs(10)),
        );
        assert!(source.is_ok());
    }
}
