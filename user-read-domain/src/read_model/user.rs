use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 读模型中的用户记录
///
/// 包含仅供内部使用的字段（如 `password_hash`），对外输出时必须经过投影白名单。
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[builder(into)]
    id: String,
    #[builder(into)]
    email: String,
    #[builder(into)]
    username: Option<String>,
    /// 口令摘要（内部字段）
    #[builder(into)]
    password_hash: Option<String>,
    #[builder(default)]
    is_active: bool,
    /// 关联资料的引用，缺省表示该用户没有资料
    #[builder(into)]
    profile_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }
}

/// 用户资料
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub display_name: Option<String>,
    #[builder(into)]
    pub avatar_url: Option<String>,
    #[builder(into)]
    pub bio: Option<String>,
}

/// 角色名（保持仓储返回的顺序）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_optional_fields() {
        let user = User::builder().id("u1").email("a@b.com").build();
        assert_eq!(user.id(), "u1");
        assert_eq!(user.email(), "a@b.com");
        assert!(!user.is_active());
        assert_eq!(user.username(), None);
        assert_eq!(user.profile_id(), None);
    }

    #[test]
    fn role_serializes_as_plain_string() {
        let roles = vec![Role::from("buyer"), Role::new("admin")];
        let json = serde_json::to_value(&roles).unwrap();
        assert_eq!(json, serde_json::json!(["buyer", "admin"]));
    }
}
