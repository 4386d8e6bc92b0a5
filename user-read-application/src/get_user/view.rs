use crate::dto::Dto;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use user_read_domain::read_model::{Profile, Role, User};

/// 用户投影：仅包含白名单字段，外加按需附加的资料与角色
///
/// 同一形状既是返回给调用方的数据，也是写入缓存的值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
}

impl Dto for UserView {}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            username: user.username().map(str::to_string),
            is_active: user.is_active(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            last_login_at: user.last_login_at(),
            profile: None,
            roles: None,
        }
    }
}
