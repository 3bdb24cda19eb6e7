// # File IP Cache
//
// Plain-text implementation of IpCache.
//
// ## File Format
//
// The file holds the raw IP string exactly as the resolver returned it, with
// no trailing newline and no other structure:
//
// ```text
// 203.0.113.7
// ```
//
// ## Write Modes
//
// - In place (default): truncate-then-write. A crash mid-write can leave the
//   file empty or partial; the next run then sees a different value and
//   sends one extra update.
// - Atomic: write to a sibling `.tmp` file, flush, then rename over the
//   cache.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::ip_cache::IpCache;

/// File-based last-known-IP cache
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::cache::FileIpCache;
/// use dyndns_core::traits::IpCache;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = FileIpCache::new("./public_ip.txt");
///
///     cache.write("1.2.3.4").await?;
///     assert_eq!(cache.read().await?, "1.2.3.4");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileIpCache {
    path: PathBuf,
    atomic: bool,
}

impl FileIpCache {
    /// Create a cache that rewrites the file in place
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_mode(path, false)
    }

    /// Create a cache that writes through a temp file and rename
    pub fn atomic<P: AsRef<Path>>(path: P) -> Self {
        Self::with_mode(path, true)
    }

    /// Create a cache with an explicit write mode
    pub fn with_mode<P: AsRef<Path>>(path: P, atomic: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            atomic,
        }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether writes go through a temp file
    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    async fn write_in_place(&self, ip: &str) -> Result<(), Error> {
        fs::write(&self.path, ip)
            .await
            .map_err(|e| Error::io(&self.path, "error writing ip to file", e))
    }

    async fn write_atomic(&self, ip: &str) -> Result<(), Error> {
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path)
                .await
                .map_err(|e| Error::io(&temp_path, "error creating temp file", e))?;

            file.write_all(ip.as_bytes())
                .await
                .map_err(|e| Error::io(&temp_path, "error writing temp file", e))?;

            file.sync_all()
                .await
                .map_err(|e| Error::io(&temp_path, "error syncing temp file", e))?;
        }

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::io(&self.path, "error replacing ip file", e))
    }
}

#[async_trait]
impl IpCache for FileIpCache {
    async fn read(&self) -> Result<String, Error> {
        match fs::read(&self.path).await {
            // Undecodable bytes just compare unequal and get overwritten
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            // No previous IP recorded: not an error
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("IP cache does not exist yet: {}", self.path.display());
                Ok(String::new())
            }
            Err(e) => Err(Error::io(&self.path, "error reading ip file", e)),
        }
    }

    async fn write(&self, ip: &str) -> Result<(), Error> {
        if self.atomic {
            self.write_atomic(ip).await?;
        } else {
            self.write_in_place(ip).await?;
        }

        tracing::trace!("IP cache written: {}", self.path.display());
        Ok(())
    }
}
