use bon::Builder;
use serde::{Deserialize, Serialize};

/// 条件类别，声明顺序即优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Id,
    Email,
    Username,
}

impl CriterionKind {
    /// 解析时依次尝试的顺序
    pub const PRIORITY: [CriterionKind; 3] =
        [CriterionKind::Id, CriterionKind::Email, CriterionKind::Username];

    /// 缓存键中的命名空间段
    pub fn namespace(self) -> &'static str {
        match self {
            CriterionKind::Id => "id",
            CriterionKind::Email => "email",
            CriterionKind::Username => "username",
        }
    }
}

/// 带类别标签的单个查询条件
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Criterion {
    Id(String),
    Email(String),
    Username(String),
}

impl Criterion {
    pub fn kind(&self) -> CriterionKind {
        match self {
            Criterion::Id(_) => CriterionKind::Id,
            Criterion::Email(_) => CriterionKind::Email,
            Criterion::Username(_) => CriterionKind::Username,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Criterion::Id(v) | Criterion::Email(v) | Criterion::Username(v) => v,
        }
    }
}

/// 用户标识条件：三者可同时出现，空串或纯空白视为缺失
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCriteria {
    #[builder(into)]
    id: Option<String>,
    #[builder(into)]
    email: Option<String>,
    #[builder(into)]
    username: Option<String>,
}

impl UserCriteria {
    pub fn id(&self) -> Option<&str> {
        present(&self.id)
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.email)
    }

    pub fn username(&self) -> Option<&str> {
        present(&self.username)
    }

    /// 去除首尾空白，并把空值归一为缺失
    pub fn normalized(self) -> Self {
        Self {
            id: self.id().map(str::to_string),
            email: self.email().map(str::to_string),
            username: self.username().map(str::to_string),
        }
    }

    /// 按优先级排列的现存条件
    pub fn ordered(&self) -> Vec<Criterion> {
        CriterionKind::PRIORITY
            .iter()
            .filter_map(|kind| match kind {
                CriterionKind::Id => self.id().map(|v| Criterion::Id(v.to_string())),
                CriterionKind::Email => self.email().map(|v| Criterion::Email(v.to_string())),
                CriterionKind::Username => {
                    self.username().map(|v| Criterion::Username(v.to_string()))
                }
            })
            .collect()
    }

    /// 生效条件：优先级最高的现存条件
    pub fn primary(&self) -> Option<Criterion> {
        self.ordered().into_iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.primary().is_none()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_follows_priority() {
        let criteria = UserCriteria::builder()
            .username("alice")
            .email("a@b.com")
            .id("u1")
            .build();
        assert_eq!(
            criteria.ordered(),
            vec![
                Criterion::Id("u1".into()),
                Criterion::Email("a@b.com".into()),
                Criterion::Username("alice".into()),
            ]
        );
        assert_eq!(criteria.primary(), Some(Criterion::Id("u1".into())));
    }

    #[test]
    fn email_wins_over_username() {
        let criteria = UserCriteria::builder()
            .email("a@b.com")
            .username("alice")
            .build();
        assert_eq!(criteria.primary().map(|c| c.kind()), Some(CriterionKind::Email));
    }

    #[test]
    fn blank_values_are_absent() {
        let criteria = UserCriteria::builder().id("").email("   ").build();
        assert!(criteria.is_empty());
        assert!(criteria.ordered().is_empty());

        let criteria = UserCriteria::builder().id("  ").username(" bob ").build();
        assert_eq!(criteria.primary(), Some(Criterion::Username("bob".into())));
    }

    #[test]
    fn normalized_trims_and_drops_blanks() {
        let criteria = UserCriteria::builder()
            .id(" u1 ")
            .email("")
            .build()
            .normalized();
        assert_eq!(criteria, UserCriteria::builder().id("u1").build());
    }
}
