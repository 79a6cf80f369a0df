//! Distributed cache backend using Redis.
//!
//! Each entry is a hash with three fields:
//!
//! - `data`: the serialized payload
//! - `absexp`: absolute deadline in unix milliseconds, or `-1`
//! - `sldexp`: sliding window in milliseconds, or `-1`
//!
//! The key's own expiry is set with `PEXPIRE` on write and recomputed from
//! both fields on every `refresh_expiry`, so any process sharing the
//! namespace observes the same clocks.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::{debug, info};

use crate::cache::backend::{CacheBackend, CacheError};
use crate::cache::policy::ExpirationPolicy;

const DATA_FIELD: &str = "data";
const ABSOLUTE_FIELD: &str = "absexp";
const SLIDING_FIELD: &str = "sldexp";
const NOT_PRESENT: i64 = -1;
const SCAN_BATCH: usize = 500;
const CONNECT_RETRIES: usize = 2;
const CONNECT_RETRY_MAX_DELAY_MS: u64 = 250;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Redis-backed cache shared by every process in the deployment.
#[derive(Clone)]
pub struct RedisCacheBackend {
    conn: ConnectionManager,
}

impl RedisCacheBackend {
    /// Connects to Redis at `url`.
    ///
    /// The connection manager reconnects on its own after the initial
    /// connection succeeds. Every command is bounded by a short response
    /// timeout so a stalled server degrades to cache misses.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(CONNECT_RETRIES)
            .set_max_delay(CONNECT_RETRY_MAX_DELAY_MS)
            .set_connection_timeout(CONNECT_TIMEOUT)
            .set_response_timeout(RESPONSE_TIMEOUT);
        let conn = ConnectionManager::new_with_config(client, config).await?;

        info!(url = %url, "Connected to Redis cache");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    fn name(&self) -> &str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let value = conn.hget::<_, _, Option<Vec<u8>>>(key, DATA_FIELD).await?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        policy: ExpirationPolicy,
    ) -> Result<(), CacheError> {
        let now = unix_millis();
        let absolute = policy
            .absolute_ttl
            .map_or(NOT_PRESENT, |ttl| now + duration_millis(ttl));
        let sliding = policy.sliding.map_or(NOT_PRESENT, duration_millis);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset_multiple(key, &[(ABSOLUTE_FIELD, absolute), (SLIDING_FIELD, sliding)])
            .ignore()
            .hset(key, DATA_FIELD, value)
            .ignore();

        match policy.ttl_on_write() {
            Some(ttl) => {
                pipe.pexpire(key, duration_millis(ttl)).ignore();
            },
            None => {
                pipe.persist(key).ignore();
            },
        }

        let mut conn = self.conn.clone();
        pipe.query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn refresh_expiry(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let (absolute, sliding): (Option<i64>, Option<i64>) = redis::cmd("HMGET")
            .arg(key)
            .arg(ABSOLUTE_FIELD)
            .arg(SLIDING_FIELD)
            .query_async(&mut conn)
            .await?;

        let (Some(absolute), Some(sliding)) = (absolute, sliding) else {
            // Entry ausente o sin metadata: nada que refrescar
            return Ok(());
        };

        match sliding_ttl_millis(unix_millis(), absolute, sliding) {
            SlidingRefresh::Unchanged => {},
            SlidingRefresh::Expire(ms) => {
                conn.pexpire::<_, ()>(key, ms).await?;
            },
            SlidingRefresh::Remove => {
                conn.del::<_, ()>(key).await?;
            },
        }
        Ok(())
    }

    async fn remove_matching(&self, pattern: &str) -> Result<usize, CacheError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += conn.del::<_, usize>(&keys).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(pattern = %pattern, count = removed, "Redis entries removed by pattern");
        Ok(removed)
    }
}

/// What a read does to a Redis entry's expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlidingRefresh {
    /// No sliding window; the write-time expiry stands.
    Unchanged,
    /// Set the key to expire in this many milliseconds.
    Expire(i64),
    /// The absolute deadline has passed.
    Remove,
}

fn sliding_ttl_millis(now: i64, absolute: i64, sliding: i64) -> SlidingRefresh {
    if sliding == NOT_PRESENT {
        return SlidingRefresh::Unchanged;
    }
    if absolute == NOT_PRESENT {
        return SlidingRefresh::Expire(sliding);
    }

    let remaining = absolute - now;
    if remaining <= 0 {
        SlidingRefresh::Remove
    } else {
        SlidingRefresh::Expire(sliding.min(remaining))
    }
}

fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_millis)
        .unwrap_or_default()
}
