//! 查询结果信封（QueryEnvelope）
//!
//! 处理器对外暴露的唯一契约：
//! - 成功时携带 `data`，失败时携带 `error` 与 `error_kind`，二者互斥；
//! - `from_cache` 为真当且仅当数据直接来自缓存、未触达仓储；
//! - `query_id` 回显发起查询的关联 id。
//!
//! 字段私有，只能经由 `success` / `failure` 构造，以保证上述不变式。
use crate::error::{AppError, ErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEnvelope<T> {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    from_cache: bool,
    query_id: String,
}

impl<T> QueryEnvelope<T> {
    pub fn success(data: T, from_cache: bool, query_id: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            from_cache,
            query_id: query_id.into(),
        }
    }

    pub fn failure(err: &AppError, query_id: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            from_cache: false,
            query_id: query_id.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    /// 拆出数据；失败时返回 `(类别, 错误文本)`
    pub fn into_result(self) -> Result<T, (ErrorKind, String)> {
        match (self.data, self.error_kind) {
            (Some(data), _) => Ok(data),
            (None, kind) => Err((
                kind.unwrap_or(ErrorKind::Infrastructure),
                self.error.unwrap_or_default(),
            )),
        }
    }
}
