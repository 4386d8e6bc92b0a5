//! 读侧查询配置
//!
//! 默认值可直接使用；部署时通过环境变量覆盖（会先尝试加载 `.env`）：
//!
//! | 变量 | 默认 | 说明 |
//! |------|------|------|
//! | `USER_QUERY_CACHE_TTL_SECS` | `300` | 回填缓存时的 TTL（秒，必须大于 0） |
//! | `USER_QUERY_CACHE_PREFIX` | `user` | 缓存键命名空间前缀 |
//! | `USER_QUERY_CACHE_CAPACITY` | `10000` | 内存缓存的最大条目数 |
//!
use bon::Builder;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const ENV_CACHE_TTL_SECS: &str = "USER_QUERY_CACHE_TTL_SECS";
pub const ENV_CACHE_PREFIX: &str = "USER_QUERY_CACHE_PREFIX";
pub const ENV_CACHE_CAPACITY: &str = "USER_QUERY_CACHE_CAPACITY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct UserQueryConfig {
    /// 回填缓存时使用的 TTL；命中缓存不会刷新该时长
    #[builder(default = Duration::from_secs(300))]
    pub cache_ttl: Duration,
    /// 缓存键前缀，实际键形如 `{prefix}:id:{value}`
    #[builder(into, default = "user".to_string())]
    pub cache_key_prefix: String,
    #[builder(default = 10_000)]
    pub cache_max_capacity: u64,
}

impl Default for UserQueryConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl UserQueryConfig {
    /// 从环境变量加载配置，未设置的项使用默认值
    ///
    /// # Errors
    ///
    /// 变量存在但无法解析，或 TTL 为 0 时返回 `ConfigError::InvalidEnvVar`。
    pub fn from_env() -> Result<Self, ConfigError> {
        // 找不到 .env 文件不是错误
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 以任意查找函数读取配置，`from_env` 与测试共用
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl = match lookup(ENV_CACHE_TTL_SECS) {
            Some(raw) => {
                let secs = parse_var::<u64>(ENV_CACHE_TTL_SECS, &raw)?;
                if secs == 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        ENV_CACHE_TTL_SECS.to_string(),
                        "ttl must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.cache_ttl,
        };

        let cache_key_prefix = match lookup(ENV_CACHE_PREFIX) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    ENV_CACHE_PREFIX.to_string(),
                    "prefix must not be empty".to_string(),
                ));
            }
            Some(raw) => raw.trim().to_string(),
            None => defaults.cache_key_prefix,
        };

        let cache_max_capacity = match lookup(ENV_CACHE_CAPACITY) {
            Some(raw) => parse_var::<u64>(ENV_CACHE_CAPACITY, &raw)?,
            None => defaults.cache_max_capacity,
        };

        Ok(Self {
            cache_ttl,
            cache_key_prefix,
            cache_max_capacity,
        })
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(name.to_string(), e.to_string()))
}
