use crate::error::AppError;
use bon::Builder;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（查询）所需的横切信息，例如：
/// - 关联 id（`correlation_id`）：链路追踪，由上游透传；
/// - 取消令牌（`cancellation`）：调用方放弃请求时取消，处理器会传递给所有协作方；
/// - 截止时间（`deadline`）：超过后处理器立即返回失败信封。
///
/// 典型用法：
/// ```rust
/// use std::time::Duration;
/// use user_read_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123")
///     .build()
///     .with_timeout(Duration::from_secs(2));
/// assert!(ctx.deadline().is_some());
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct AppContext {
    #[builder(into)]
    correlation_id: Option<String>,
    #[builder(default)]
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl AppContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 以当前时刻为起点设置截止时间
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// 同步检查：已取消或已过截止时间则返回对应错误
    pub fn check(&self) -> Result<(), AppError> {
        if self.cancellation.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(AppError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// 等待直到调用被取消或超过截止时间，返回对应错误；两者皆无时永不完成
    ///
    /// 已过期的上下文在首次轮询时即完成，不依赖计时器的精度。
    pub async fn done(&self) -> AppError {
        if let Err(err) = self.check() {
            return err;
        }
        match self.deadline {
            Some(deadline) => tokio::select! {
                _ = self.cancellation.cancelled() => AppError::Cancelled,
                _ = tokio::time::sleep_until(deadline) => AppError::DeadlineExceeded,
            },
            None => {
                self.cancellation.cancelled().await;
                AppError::Cancelled
            }
        }
    }

    /// 交给协作方的调用级令牌：调用方取消或超过截止时间时被取消
    ///
    /// 需在 tokio 运行时内调用；设置了截止时间时会挂一个计时任务，令牌离开作用域即停止。
    pub fn call_token(&self) -> CallToken {
        let token = self.cancellation.child_token();
        let timer = match self.deadline {
            Some(_) if self.check().is_err() => {
                token.cancel();
                None
            }
            Some(deadline) => {
                let token = token.clone();
                Some(tokio::spawn(async move {
                    tokio::time::sleep_until(deadline).await;
                    token.cancel();
                }))
            }
            None => None,
        };
        CallToken { token, timer }
    }
}

/// 调用级取消令牌，见 [`AppContext::call_token`]
pub struct CallToken {
    token: CancellationToken,
    timer: Option<JoinHandle<()>>,
}

impl CallToken {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for CallToken {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
