//! Configuration types for the updater
//!
//! Two things live here:
//!
//! - [`Credentials`]: the account file (`{"Username", "Password", "FQDN"}`),
//!   owned by the operator and only ever read by the program.
//! - [`Settings`]: the paths and endpoints a run talks to. Every component
//!   receives the values it needs from here instead of reading globals.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default location of the credentials file
pub const DEFAULT_CONFIG_PATH: &str = "./dyndns.conf";

/// Default location of the last-known-IP cache
pub const DEFAULT_CACHE_PATH: &str = "./public_ip.txt";

/// Default IP-echo service
pub const DEFAULT_IP_SERVICE_URL: &str = "https://domains.google.com/checkip";

/// Response format requested from the IP-echo service
pub const DEFAULT_IP_SERVICE_FORMAT: &str = "text";

/// Default dyndns2 update endpoint
pub const DEFAULT_UPDATE_URL: &str = "https://domains.google.com/nic/update";

/// Upper bound for the optional HTTP timeout
pub const MAX_HTTP_TIMEOUT_SECS: u64 = 300;

/// Account credentials and the record to keep in sync
///
/// Keys in the JSON file are matched case-insensitively, unknown keys are
/// ignored and missing keys leave the field empty. Contents are not
/// validated: empty credentials are passed through to the provider as-is.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Provider account name
    pub username: String,

    /// Provider account password
    /// ⚠️ NEVER log this value
    pub password: String,

    /// Fully qualified domain name of the record
    pub fqdn: String,
}

impl Credentials {
    /// Create credentials from their parts
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        fqdn: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            fqdn: fqdn.into(),
        }
    }

    /// Parse credentials from a JSON document
    ///
    /// Only the first JSON value is decoded; anything after it is ignored.
    pub fn from_json(content: &str) -> Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(content);
        Self::deserialize(&mut deserializer)
            .map_err(|e| Error::config(format!("error decoding config file: {}", e)))
    }

    /// Load credentials from a JSON file
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the file cannot be opened or does not decode
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::config(format!(
                "error opening config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("fqdn", &self.fqdn)
            .finish()
    }
}

impl<'de> Deserialize<'de> for Credentials {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CredentialsVisitor)
    }
}

struct CredentialsVisitor;

impl<'de> Visitor<'de> for CredentialsVisitor {
    type Value = Credentials;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with Username, Password and FQDN fields")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Credentials, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut credentials = Credentials::default();

        while let Some(key) = map.next_key::<String>()? {
            let slot = if key.eq_ignore_ascii_case("username") {
                Some(&mut credentials.username)
            } else if key.eq_ignore_ascii_case("password") {
                Some(&mut credentials.password)
            } else if key.eq_ignore_ascii_case("fqdn") {
                Some(&mut credentials.fqdn)
            } else {
                None
            };

            match slot {
                // null leaves the field untouched
                Some(slot) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *slot = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(credentials)
    }
}

/// Runtime settings for a single run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Path of the credentials file
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Path of the last-known-IP cache file
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Write the cache through a temp file and rename
    ///
    /// Off by default: the cache is truncated and rewritten in place, so an
    /// interrupted write can leave it empty or partial. An empty cache only
    /// causes one extra update on the next run.
    #[serde(default)]
    pub cache_atomic: bool,

    /// IP-echo service URL
    #[serde(default = "default_ip_service_url")]
    pub ip_service_url: String,

    /// Value of the `format` query parameter sent to the IP-echo service
    #[serde(default = "default_ip_service_format")]
    pub ip_service_format: String,

    /// dyndns2 update endpoint (credentials are added per request)
    #[serde(default = "default_update_url")]
    pub update_url: String,

    /// HTTP timeout in seconds; `None` keeps the transport defaults
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
}

impl Settings {
    /// Create settings with the built-in defaults
    pub fn new() -> Self {
        Self {
            config_path: default_config_path(),
            cache_path: default_cache_path(),
            cache_atomic: false,
            ip_service_url: default_ip_service_url(),
            ip_service_format: default_ip_service_format(),
            update_url: default_update_url(),
            http_timeout_secs: None,
        }
    }

    /// HTTP timeout as a [`Duration`], if one is configured
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.config_path.as_os_str().is_empty() {
            return Err(Error::invalid_input("Config file path cannot be empty"));
        }

        if self.cache_path.as_os_str().is_empty() {
            return Err(Error::invalid_input("Cache file path cannot be empty"));
        }

        validate_url("IP service URL", &self.ip_service_url)?;
        validate_url("Update URL", &self.update_url)?;

        if let Some(timeout) = self.http_timeout_secs
            && !(1..=MAX_HTTP_TIMEOUT_SECS).contains(&timeout)
        {
            return Err(Error::invalid_input(format!(
                "HTTP timeout must be between 1 and {} seconds. Got: {}",
                MAX_HTTP_TIMEOUT_SECS, timeout
            )));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_url(what: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(Error::invalid_input(format!("{} cannot be empty", what)));
    }

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(Error::invalid_input(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }

    if url.starts_with("http://") {
        tracing::warn!("{} uses HTTP (not HTTPS): {}", what, url);
    }

    Ok(())
}

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

fn default_ip_service_url() -> String {
    DEFAULT_IP_SERVICE_URL.to_string()
}

fn default_ip_service_format() -> String {
    DEFAULT_IP_SERVICE_FORMAT.to_string()
}

fn default_update_url() -> String {
    DEFAULT_UPDATE_URL.to_string()
}
