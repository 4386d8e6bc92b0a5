use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use user_read_domain::error::DomainResult as Result;

/// 缓存服务协议（外部协作方）
///
/// - `get`：未命中或已过期返回 `Ok(None)`；
/// - `set`：以给定 TTL 写入（覆盖）条目；
/// - 读取不应延长条目的剩余寿命。
#[async_trait]
pub trait CacheService: Send + Sync {
    async fn get(&self, key: &str, cancel: &CancellationToken) -> Result<Option<Value>>;

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

#[async_trait]
impl<T> CacheService for Arc<T>
where
    T: CacheService + ?Sized,
{
    async fn get(&self, key: &str, cancel: &CancellationToken) -> Result<Option<Value>> {
        (**self).get(key, cancel).await
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Duration,
        cancel: &CancellationToken,
    ) -> Result<()> {
        (**self).set(key, value, ttl, cancel).await
    }
}
