//! Test doubles and common utilities for workflow contract tests
//!
//! Every double counts its calls so a test can assert which steps of a run
//! happened and which did not. Clones share their counters, so a test keeps
//! one handle and hands a boxed clone to the engine.

#![allow(dead_code)]

use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{DnsProvider, IpCache, IpSource, UpdateResult};
use dyndns_core::{Credentials, DdnsEngine, MemoryIpCache};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a [`MockIpSource`] answers
#[derive(Debug, Clone)]
pub enum IpAnswer {
    Ip(String),
    NetworkFailure,
    Status(u16),
}

/// An IpSource with a scripted answer
#[derive(Clone)]
pub struct MockIpSource {
    answer: Arc<Mutex<IpAnswer>>,
    call_count: Arc<AtomicUsize>,
}

impl MockIpSource {
    pub fn returning(ip: &str) -> Self {
        Self::with_answer(IpAnswer::Ip(ip.to_string()))
    }

    pub fn with_answer(answer: IpAnswer) -> Self {
        Self {
            answer: Arc::new(Mutex::new(answer)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the answer for later calls
    pub fn set_answer(&self, answer: IpAnswer) {
        *self.answer.lock().unwrap() = answer;
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for MockIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.answer.lock().unwrap().clone() {
            IpAnswer::Ip(ip) => Ok(ip),
            IpAnswer::NetworkFailure => Err(Error::network("connection refused")),
            IpAnswer::Status(status) => Err(Error::upstream(format!(
                "responded with non-200 status code: {}",
                status
            ))),
        }
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// One recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub username: String,
    pub password: String,
    pub fqdn: String,
    pub ip: String,
}

/// A DnsProvider that records calls
#[derive(Clone)]
pub struct MockDnsProvider {
    /// `None` simulates a transport failure
    response: Arc<Mutex<Option<UpdateResult>>>,
    calls: Arc<Mutex<Vec<UpdateCall>>>,
}

impl MockDnsProvider {
    /// Provider that answers `200 good`
    pub fn new() -> Self {
        Self::answering(UpdateResult::new(200, "good"))
    }

    pub fn answering(response: UpdateResult) -> Self {
        Self {
            response: Arc::new(Mutex::new(Some(response))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider whose requests never reach the server
    pub fn unreachable() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Get the recorded calls
    pub fn calls(&self) -> Vec<UpdateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn update_record(&self, credentials: &Credentials, new_ip: &str) -> Result<UpdateResult> {
        self.calls.lock().unwrap().push(UpdateCall {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            fqdn: credentials.fqdn.clone(),
            ip: new_ip.to_string(),
        });

        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::network("error updating Dynamic DNS record: connection reset"))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An IpCache that counts reads and writes
#[derive(Clone, Default)]
pub struct CountingCache {
    inner: MemoryIpCache,
    read_count: Arc<AtomicUsize>,
    write_count: Arc<AtomicUsize>,
}

impl CountingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip(ip: &str) -> Self {
        Self {
            inner: MemoryIpCache::with_ip(ip),
            ..Self::default()
        }
    }

    /// Get the number of times read() was called
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Get the number of times write() was called
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Current cached value
    pub async fn value(&self) -> String {
        self.inner.read().await.unwrap()
    }
}

#[async_trait::async_trait]
impl IpCache for CountingCache {
    async fn read(&self) -> Result<String> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.inner.read().await
    }

    async fn write(&self, ip: &str) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.inner.write(ip).await
    }
}

/// The credentials file used by most scenarios
pub const SCENARIO_CONFIG: &str = r#"{"Username":"u","Password":"p","FQDN":"host.example.com"}"#;

/// Write a credentials file into `dir` and return its path
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("dyndns.conf");
    std::fs::write(&path, content).expect("config file is writable");
    path
}

/// Build an engine from test doubles
pub fn engine_with(
    config_path: &Path,
    ip_source: &MockIpSource,
    provider: &MockDnsProvider,
    cache: Box<dyn IpCache>,
) -> DdnsEngine {
    DdnsEngine::new(
        config_path,
        Box::new(ip_source.clone()),
        Box::new(provider.clone()),
        cache,
    )
}
