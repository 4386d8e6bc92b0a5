//! 读模型仓储协议
//!
//! 所有方法都可能因瞬时 I/O 失败返回错误；“未找到”不是错误，以 `Ok(None)` 表示。
//! 每个方法都接收一个取消令牌，实现方应在令牌取消后尽快放弃进行中的 I/O。
//!
use super::{Profile, Role, User};
use crate::error::DomainResult as Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait ReadModelRepository: Send + Sync {
    async fn find_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str, cancel: &CancellationToken)
    -> Result<Option<User>>;

    async fn find_by_username(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>>;

    async fn get_profile(
        &self,
        profile_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Profile>>;

    /// 返回用户的角色列表（保持存储中的顺序），无角色时返回空列表
    async fn get_user_roles(&self, user_id: &str, cancel: &CancellationToken)
    -> Result<Vec<Role>>;
}

#[async_trait]
impl<T> ReadModelRepository for Arc<T>
where
    T: ReadModelRepository + ?Sized,
{
    async fn find_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Option<User>> {
        (**self).find_by_id(id, cancel).await
    }

    async fn find_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>> {
        (**self).find_by_email(email, cancel).await
    }

    async fn find_by_username(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>> {
        (**self).find_by_username(username, cancel).await
    }

    async fn get_profile(
        &self,
        profile_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Profile>> {
        (**self).get_profile(profile_id, cancel).await
    }

    async fn get_user_roles(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Role>> {
        (**self).get_user_roles(user_id, cancel).await
    }
}
