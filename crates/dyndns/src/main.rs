// # dyndns - single-shot dynamic DNS updater
//
// This binary is a THIN integration layer: all workflow logic lives in
// dyndns-core. It is responsible for:
// 1. Reading runtime settings from environment variables
// 2. Initializing logging and the runtime
// 3. Building the IP source, provider and cache
// 4. Running the engine once
//
// Run it from cron or a systemd timer; it does one pass and exits.
//
// ## Configuration
//
// Account credentials live in the JSON config file:
//
// ```json
// {"Username": "user", "Password": "pass", "FQDN": "host.example.com"}
// ```
//
// Everything else is set via environment variables:
//
// - `DDNS_CONFIG_FILE`: Credentials file (default ./dyndns.conf)
// - `DDNS_CACHE_FILE`: Last-known-IP file (default ./public_ip.txt)
// - `DDNS_CACHE_ATOMIC`: Write the cache via temp file + rename (true/false)
// - `DDNS_IP_SERVICE_URL`: IP-echo service (default https://domains.google.com/checkip)
// - `DDNS_IP_SERVICE_FORMAT`: `format` query parameter (default text)
// - `DDNS_UPDATE_URL`: nic/update endpoint (default https://domains.google.com/nic/update)
// - `DDNS_HTTP_TIMEOUT_SECS`: HTTP timeout, unset for transport defaults
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Exit Status
//
// A run that aborts on a workflow error (config file, network, upstream,
// cache) still exits 0 after printing the error and "done"; so does a run
// where the IP was unchanged. Non-zero codes are reserved for failures
// before the workflow starts.
//
// ## Example
//
// ```bash
// export DDNS_CONFIG_FILE=/etc/dyndns/dyndns.conf
// export DDNS_CACHE_FILE=/var/lib/dyndns/public_ip.txt
//
// dyndns
// ```

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use dyndns_core::{DdnsEngine, FileIpCache, RunOutcome, Settings};
use dyndns_ip_http::HttpIpSource;
use dyndns_provider_nic::NicUpdateProvider;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Run finished (updated, unchanged, or aborted on a workflow error)
    Finished = 0,
    /// Invalid environment settings or logger setup failure
    SettingsError = 1,
    /// Runtime could not be created
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    settings: Settings,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(path) = lookup("DDNS_CONFIG_FILE") {
            settings.config_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("DDNS_CACHE_FILE") {
            settings.cache_path = PathBuf::from(path);
        }
        if let Some(value) = lookup("DDNS_CACHE_ATOMIC") {
            settings.cache_atomic = parse_bool(&value)
                .with_context(|| format!("DDNS_CACHE_ATOMIC must be true or false. Got: {}", value))?;
        }
        if let Some(url) = lookup("DDNS_IP_SERVICE_URL") {
            settings.ip_service_url = url;
        }
        if let Some(format) = lookup("DDNS_IP_SERVICE_FORMAT") {
            settings.ip_service_format = format;
        }
        if let Some(url) = lookup("DDNS_UPDATE_URL") {
            settings.update_url = url;
        }
        if let Some(value) = lookup("DDNS_HTTP_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().with_context(|| {
                format!("DDNS_HTTP_TIMEOUT_SECS must be a number of seconds. Got: {}", value)
            })?;
            settings.http_timeout_secs = Some(secs);
        }

        Ok(Self {
            settings,
            log_level: lookup("DDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        self.log_level()?;
        Ok(())
    }

    /// Parsed log level
    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::SettingsError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DdnsExitCode::SettingsError.into();
    }

    // Initialize tracing
    let log_level = config.log_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::SettingsError.into();
    }

    // One pass, one thread
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_updater(&config.settings).await {
            // Already reported by the failing step
            debug!("Run aborted: {:#}", e);
        }
    });

    info!("done");
    DdnsExitCode::Finished.into()
}

/// Build the components and run the engine once
async fn run_updater(settings: &Settings) -> Result<RunOutcome> {
    debug!("Settings: {:?}", settings);

    let ip_source = HttpIpSource::from_settings(settings)
        .inspect_err(|e| error!("could not create IP source: {}", e))?;
    let provider = NicUpdateProvider::from_settings(settings)
        .inspect_err(|e| error!("could not create DNS provider: {}", e))?;
    let cache = FileIpCache::with_mode(&settings.cache_path, settings.cache_atomic);

    let engine = DdnsEngine::new(
        settings.config_path.clone(),
        Box::new(ip_source),
        Box::new(provider),
        Box::new(cache),
    );

    let outcome = engine.run_once().await?;
    Ok(outcome)
}
