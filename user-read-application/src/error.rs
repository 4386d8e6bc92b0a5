use serde::{Deserialize, Serialize};
use user_read_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl AppError {
    /// 错误类别：随失败信封一并返回，调用方据此区分，而非解析错误文本
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Domain(_) => ErrorKind::Infrastructure,
            AppError::Cancelled => ErrorKind::Cancelled,
            AppError::DeadlineExceeded => ErrorKind::DeadlineExceeded,
        }
    }
}

/// 失败信封中的错误类别标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 查询条件非法，未发生任何 I/O
    Validation,
    /// 读模型中不存在匹配记录（不缓存、不重试）
    NotFound,
    /// 缓存或仓储的瞬时故障（不自动重试，由调用方决定）
    Infrastructure,
    Cancelled,
    DeadlineExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_are_infrastructure() {
        let err: AppError = DomainError::repository("boom").into();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert_eq!(err.to_string(), "domain: repository error: boom");
    }

    #[test]
    fn not_found_message_is_fixed() {
        let err = AppError::NotFound("user");
        assert_eq!(err.to_string(), "user not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let v = serde_json::to_value(ErrorKind::DeadlineExceeded).unwrap();
        assert_eq!(v, serde_json::json!("deadline_exceeded"));
    }
}
