//! Cache backend with a switch that makes every call fail.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use logitrack_server::cache::{CacheBackend, CacheError, ExpirationPolicy, MemoryCacheBackend};

/// In-process backend that can be taken down.
pub struct FlakyCache {
    inner: MemoryCacheBackend,
    down: AtomicBool,
    failures: AtomicUsize,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCacheBackend::with_defaults(),
            down: AtomicBool::new(false),
            failures: AtomicUsize::new(0),
        }
    }

    /// Makes every following call fail (or succeed again).
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Calls rejected while down.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Reads the raw entry, bypassing the switch.
    pub async fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.get(key).await.unwrap_or(None)
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.down.load(Ordering::SeqCst) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            Err(CacheError::unavailable("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheBackend for FlakyCache {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        policy: ExpirationPolicy,
    ) -> Result<(), CacheError> {
        self.check()?;
        self.inner.set(key, value, policy).await
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.check()?;
        self.inner.remove(key).await
    }

    async fn refresh_expiry(&self, key: &str) -> Result<(), CacheError> {
        self.check()?;
        self.inner.refresh_expiry(key).await
    }

    async fn remove_matching(&self, pattern: &str) -> Result<usize, CacheError> {
        self.check()?;
        self.inner.remove_matching(pattern).await
    }
}
