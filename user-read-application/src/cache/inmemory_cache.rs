//! 内存版缓存（InMemoryCache）
//!
//! 基于 `moka::future::Cache` 实现 `CacheService`：
//! - 每个条目携带写入时指定的 TTL，由自定义 `Expiry` 在创建/覆盖时生效；
//! - 读取沿用剩余寿命，不做续期；
//! - 超出容量时按 moka 的策略淘汰。

use super::CacheService;
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use user_read_domain::error::{DomainError, DomainResult as Result};

#[derive(Clone)]
struct Entry {
    value: Value,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

#[derive(Clone)]
pub struct InMemoryCache {
    inner: Cache<String, Entry>,
}

impl InMemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }

    /// 当前条目数（近似值，含尚未清理的过期条目）
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get(&self, key: &str, cancel: &CancellationToken) -> Result<Option<Value>> {
        if cancel.is_cancelled() {
            return Err(DomainError::cache("operation cancelled"));
        }
        Ok(self.inner.get(key).await.map(|e| e.value))
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(DomainError::cache("operation cancelled"));
        }
        self.inner
            .insert(key.to_string(), Entry { value, ttl })
            .await;
        Ok(())
    }
}
