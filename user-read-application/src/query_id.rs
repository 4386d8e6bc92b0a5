//! 查询关联 id 生成器
//!
//! 查询 id 仅用于关联（信封回显与日志），只需在进程内高概率唯一，
//! 不是主键，不得用作缓存或存储键。生成器以 trait 注入，测试可提供确定性实现。
//!
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use ulid::{Generator, Ulid};

pub trait QueryIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// 基于单调 ULID 的生成器（默认实现）
pub struct UlidQueryIdGenerator {
    inner: Mutex<Generator>,
}

impl Default for UlidQueryIdGenerator {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Generator::new()),
        }
    }
}

impl UlidQueryIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryIdGenerator for UlidQueryIdGenerator {
    fn next_id(&self) -> String {
        let generated = match self.inner.lock() {
            Ok(mut g) => g.generate().ok(),
            Err(_) => None,
        };
        // 同一毫秒内随机部分溢出（或锁中毒）时退回到非单调 ULID
        generated.unwrap_or_else(Ulid::new).to_string()
    }
}

/// 确定性生成器：`{prefix}-1`、`{prefix}-2` ……
pub struct SequentialQueryIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialQueryIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl QueryIdGenerator for SequentialQueryIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n}", self.prefix)
    }
}
