// # dyndns-core
//
// Core library for the single-shot dynamic DNS updater.
//
// ## Architecture Overview
//
// One run walks four steps, top to bottom, and stops at the first failure:
// - **Credentials**: account and record name, loaded from a JSON file
// - **IpSource**: trait for discovering the public IP address
// - **IpCache**: trait for the last address sent to the provider
// - **DnsProvider**: trait for pushing a new address to the provider
// - **DdnsEngine**: runs the steps in order
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Explicit Settings**: Paths and endpoints are passed in, never global
// 3. **Single Shot**: One attempt per run; scheduling belongs to the caller
// 4. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod cache;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, IpCache, UpdateResult};
pub use engine::{DdnsEngine, RunOutcome};
pub use config::{Credentials, Settings};
pub use error::{Error, Result};
pub use cache::{FileIpCache, MemoryIpCache};
