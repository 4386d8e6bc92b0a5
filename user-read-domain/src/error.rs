//! 领域层统一错误定义
//!
//! 聚焦读模型仓储、缓存与序列化的最小必要集合，
//! 便于在各实现层统一转换为 `DomainError`。
//!
use thiserror::Error;

/// 统一错误类型（读侧最小必要集）
///
/// 仅携带字符串原因，因此可 `Clone`：同一次在途查询的结果需要分发给多个等待方。
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // --- 仓储/缓存 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("cache error: {reason}")]
    Cache { reason: String },

    // --- 序列化 ---
    #[error("serialization error: {reason}")]
    Serde { reason: String },
}

impl DomainError {
    pub fn repository(reason: impl Into<String>) -> Self {
        DomainError::Repository {
            reason: reason.into(),
        }
    }

    pub fn cache(reason: impl Into<String>) -> Self {
        DomainError::Cache {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// 允许在基础设施层直接使用 `?` 将序列化错误转换为 DomainError
impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serde {
            reason: err.to_string(),
        }
    }
}
