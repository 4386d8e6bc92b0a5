//! 缓存层
//!
//! 提供 [`CacheService`] 协议及其内存实现：
//! - [`CacheService`]：按键读写序列化后的值，写入时指定 TTL；
//! - [`InMemoryCache`]：基于 `moka` 的进程内缓存，逐条目遵循写入时的 TTL（需启用 `inmemory` 特性）。

mod cache_service;
#[cfg(feature = "inmemory")]
mod inmemory_cache;

pub use cache_service::CacheService;
#[cfg(feature = "inmemory")]
pub use inmemory_cache::InMemoryCache;
