//! 内存版读模型（InMemoryReadModel）
//!
//! 基于 `DashMap` 的轻量读模型实现，满足 `ReadModelRepository` 协议：
//! - 以 id 为主键保存用户，并维护 email / username 二级索引；
//! - 资料与角色分别按 profile id / user id 保存；
//! - 典型用途：测试环境、示例与本地开发。
//!
//! 注意：该实现不模拟 I/O 失败；取消令牌被取消时直接返回仓储错误。

use super::{Profile, ReadModelRepository, Role, User};
use crate::error::{DomainError, DomainResult as Result};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct InMemoryReadModel {
    users: DashMap<String, User>,
    by_email: DashMap<String, String>,
    by_username: DashMap<String, String>,
    profiles: DashMap<String, Profile>,
    roles: DashMap<String, Vec<Role>>,
}

impl InMemoryReadModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入（或覆盖）一条用户记录并刷新二级索引
    pub fn upsert_user(&self, user: User) {
        if let Some(old) = self.users.get(user.id()).map(|u| u.clone()) {
            self.by_email.remove(old.email());
            if let Some(name) = old.username() {
                self.by_username.remove(name);
            }
        }

        self.by_email
            .insert(user.email().to_string(), user.id().to_string());
        if let Some(name) = user.username() {
            self.by_username.insert(name.to_string(), user.id().to_string());
        }
        self.users.insert(user.id().to_string(), user);
    }

    pub fn upsert_profile(&self, profile: Profile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    pub fn set_roles(&self, user_id: impl Into<String>, roles: Vec<Role>) {
        self.roles.insert(user_id.into(), roles);
    }

    fn ensure_active(cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(DomainError::repository("operation cancelled"));
        }
        Ok(())
    }

    fn user_by_index(&self, index: &DashMap<String, String>, key: &str) -> Option<User> {
        let id = index.get(key).map(|id| id.clone())?;
        self.users.get(&id).map(|u| u.clone())
    }
}

#[async_trait]
impl ReadModelRepository for InMemoryReadModel {
    async fn find_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Option<User>> {
        Self::ensure_active(cancel)?;
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>> {
        Self::ensure_active(cancel)?;
        Ok(self.user_by_index(&self.by_email, email))
    }

    async fn find_by_username(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>> {
        Self::ensure_active(cancel)?;
        Ok(self.user_by_index(&self.by_username, username))
    }

    async fn get_profile(
        &self,
        profile_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Profile>> {
        Self::ensure_active(cancel)?;
        Ok(self.profiles.get(profile_id).map(|p| p.clone()))
    }

    async fn get_user_roles(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Role>> {
        Self::ensure_active(cancel)?;
        Ok(self
            .roles
            .get(user_id)
            .map(|r| r.clone())
            .unwrap_or_default())
    }
}
