use super::criteria::{Criterion, UserCriteria};
use super::view::UserView;
use crate::{error::AppError, query::Query, query_id::QueryIdGenerator};
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 按需附加的扩展信息，默认均不加载
#[derive(Builder, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryOptions {
    #[builder(default)]
    pub include_profile: bool,
    #[builder(default)]
    pub include_roles: bool,
}

/// 获取单个用户的查询
///
/// 构造后不可变；`query_id` 与 `timestamp` 在构造时分配，仅用于关联与记录。
#[derive(Debug, Clone)]
pub struct GetUserQuery {
    criteria: UserCriteria,
    options: QueryOptions,
    query_id: String,
    timestamp: DateTime<Utc>,
}

impl GetUserQuery {
    pub fn new(criteria: UserCriteria, options: QueryOptions, ids: &dyn QueryIdGenerator) -> Self {
        Self {
            criteria: criteria.normalized(),
            options,
            query_id: ids.next_id(),
            timestamp: Utc::now(),
        }
    }

    /// 校验：id、email、username 全部缺失时失败，否则返回生效的（优先级最高的）条件；
    /// 可重复调用，无副作用
    pub fn validate(&self) -> Result<Criterion, AppError> {
        self.criteria.primary().ok_or_else(|| {
            AppError::Validation("one of id, email or username is required".to_string())
        })
    }

    pub fn criteria(&self) -> &UserCriteria {
        &self.criteria
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Query for GetUserQuery {
    const NAME: &'static str = "GetUser";
    type Dto = UserView;

    fn query_id(&self) -> &str {
        &self.query_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::query_id::SequentialQueryIdGenerator;

    #[test]
    fn validate_fails_iff_all_criteria_absent() {
        let ids = SequentialQueryIdGenerator::new("q");
        let cases = [
            (UserCriteria::default(), false),
            (UserCriteria::builder().id(" ").email("").build(), false),
            (UserCriteria::builder().id("u1").build(), true),
            (UserCriteria::builder().email("a@b.com").build(), true),
            (UserCriteria::builder().username("alice").build(), true),
        ];

        for (criteria, valid) in cases {
            let q = GetUserQuery::new(criteria, QueryOptions::default(), &ids);
            assert_eq!(q.validate().is_ok(), valid, "{q:?}");
            // 重复调用结果一致
            assert_eq!(q.validate().is_ok(), valid);
            if !valid {
                assert_eq!(q.validate().unwrap_err().kind(), ErrorKind::Validation);
            }
        }
    }

    #[test]
    fn validate_returns_highest_priority_criterion() {
        let ids = SequentialQueryIdGenerator::new("q");
        let q = GetUserQuery::new(
            UserCriteria::builder().email("a@b.com").username("alice").build(),
            QueryOptions::default(),
            &ids,
        );
        assert_eq!(q.validate(), Ok(Criterion::Email("a@b.com".to_string())));
    }

    #[test]
    fn construction_assigns_id_and_defaults() {
        let ids = SequentialQueryIdGenerator::new("q");
        let before = Utc::now();
        let q = GetUserQuery::new(
            UserCriteria::builder().id(" u1 ").build(),
            QueryOptions::default(),
            &ids,
        );

        assert_eq!(q.query_id(), "q-1");
        assert_eq!(q.criteria().id(), Some("u1"));
        assert!(!q.options().include_profile);
        assert!(!q.options().include_roles);
        assert!(q.timestamp() >= before);
    }
}
