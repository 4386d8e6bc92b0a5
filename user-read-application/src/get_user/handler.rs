use super::cache_key::cache_key;
use super::criteria::Criterion;
use super::query::{GetUserQuery, QueryOptions};
use super::view::UserView;
use crate::cache::CacheService;
use crate::config::UserQueryConfig;
use crate::context::AppContext;
use crate::envelope::QueryEnvelope;
use crate::error::{AppError, ErrorKind};
use crate::query::Query;
use crate::query_handler::QueryHandler;
use crate::single_flight::SingleFlight;
use async_trait::async_trait;
use bon::Builder;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use user_read_domain::error::DomainError;
use user_read_domain::read_model::ReadModelRepository;

type Resolution = Result<UserView, AppError>;

/// GetUser 查询处理器
///
/// 无状态编排：缓存优先（cache-aside），未命中时回源读模型并回填缓存。
/// - 命中缓存直接返回，不触达仓储，也不刷新条目 TTL；
/// - 未命中时按生效条件只调用一次仓储查找，同键并发未命中合并为一次回源；
/// - 未找到不写缓存（不做负缓存）；
/// - 任何失败都转换为失败信封，从不向调用方传播错误。
#[derive(Builder)]
pub struct GetUserQueryHandler {
    repository: Arc<dyn ReadModelRepository>,
    cache: Arc<dyn CacheService>,
    #[builder(default)]
    config: UserQueryConfig,
    #[builder(skip)]
    flights: SingleFlight<Resolution>,
}

impl GetUserQueryHandler {
    pub fn config(&self) -> &UserQueryConfig {
        &self.config
    }

    /// 当前在途（合并中）的回源数量
    pub fn in_flight(&self) -> usize {
        self.flights.in_flight()
    }

    /// 与 `q` 同一航班上正在等待的调用方数量；无效查询返回 0
    pub fn waiters_for(&self, q: &GetUserQuery) -> usize {
        q.criteria()
            .primary()
            .map(|criterion| {
                let key = cache_key(&self.config.cache_key_prefix, &criterion);
                self.flights.waiters(&flight_key(&key, q.options()))
            })
            .unwrap_or(0)
    }

    async fn resolve(
        &self,
        ctx: &AppContext,
        q: &GetUserQuery,
    ) -> Result<(UserView, bool), AppError> {
        let criterion = q.validate()?;
        ctx.check()?;

        let key = cache_key(&self.config.cache_key_prefix, &criterion);
        if let Some(view) = self.lookup_cache(ctx, &key).await? {
            debug!(key = %key, "cache hit");
            return Ok((view, true));
        }
        debug!(key = %key, criterion = ?criterion.kind(), "cache miss");

        let options = q.options();
        let repository = self.repository.clone();
        let cache = self.cache.clone();
        let ttl = self.config.cache_ttl;
        let flight = flight_key(&key, options);

        ctx.check()?;
        let view = self
            .flights
            .run(&flight, ctx, move |token| {
                load(repository, cache, ttl, key, criterion, options, token)
            })
            .await??;

        Ok((view, false))
    }

    async fn lookup_cache(
        &self,
        ctx: &AppContext,
        key: &str,
    ) -> Result<Option<UserView>, AppError> {
        let call = ctx.call_token();
        let cached = tokio::select! {
            biased;
            err = ctx.done() => return Err(err),
            cached = self.cache.get(key, call.token()) => cached?,
        };

        let Some(value) = cached else {
            return Ok(None);
        };

        match serde_json::from_value::<UserView>(value) {
            Ok(view) => Ok(Some(view)),
            Err(err) => {
                // 损坏的条目按未命中处理，回源后会被覆盖
                warn!(key, error = %err, "undecodable cache entry");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl QueryHandler<GetUserQuery> for GetUserQueryHandler {
    #[instrument(
        name = "query",
        skip_all,
        fields(
            query = GetUserQuery::NAME,
            query_id = %q.query_id(),
            correlation_id = ctx.correlation_id(),
        )
    )]
    async fn handle(&self, ctx: &AppContext, q: GetUserQuery) -> QueryEnvelope<UserView> {
        match self.resolve(ctx, &q).await {
            Ok((view, from_cache)) => QueryEnvelope::success(view, from_cache, q.query_id()),
            Err(err) => {
                match err.kind() {
                    ErrorKind::Infrastructure => warn!(error = %err, "query failed"),
                    kind => debug!(?kind, error = %err, "query rejected"),
                }
                QueryEnvelope::failure(&err, q.query_id())
            }
        }
    }
}

/// 航班键：缓存键附加定长的选项后缀，选项不同的请求不会合并
fn flight_key(cache_key: &str, options: QueryOptions) -> String {
    format!(
        "{cache_key}#{}{}",
        u8::from(options.include_profile),
        u8::from(options.include_roles)
    )
}

/// 一次回源：查找 → 投影 → 按需附加 → 回填缓存
async fn load(
    repository: Arc<dyn ReadModelRepository>,
    cache: Arc<dyn CacheService>,
    ttl: Duration,
    key: String,
    criterion: Criterion,
    options: QueryOptions,
    token: CancellationToken,
) -> Resolution {
    let found = match &criterion {
        Criterion::Id(id) => repository.find_by_id(id, &token).await?,
        Criterion::Email(email) => repository.find_by_email(email, &token).await?,
        Criterion::Username(username) => repository.find_by_username(username, &token).await?,
    };

    let Some(user) = found else {
        debug!(key = %key, "user not found, skipping cache write");
        return Err(AppError::NotFound("user"));
    };

    let mut view = UserView::from(&user);

    if options.include_profile {
        match user.profile_id() {
            Some(profile_id) => view.profile = repository.get_profile(profile_id, &token).await?,
            None => debug!(user_id = user.id(), "no profile reference"),
        }
    }

    if options.include_roles {
        view.roles = Some(repository.get_user_roles(user.id(), &token).await?);
    }

    let value = serde_json::to_value(&view).map_err(DomainError::from)?;
    cache.set(&key, value, ttl, &token).await?;

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get_user::UserCriteria;
    use crate::query_id::SequentialQueryIdGenerator;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use user_read_domain::error::DomainResult;
    use user_read_domain::read_model::{Profile, Role, User};

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, Value>>,
        fail_get: bool,
    }

    #[async_trait]
    impl CacheService for MapCache {
        async fn get(&self, key: &str, _c: &CancellationToken) -> DomainResult<Option<Value>> {
            if self.fail_get {
                return Err(DomainError::cache("connection refused"));
            }
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(
            &self,
            key: &str,
            value: Value,
            _ttl: Duration,
            _c: &CancellationToken,
        ) -> DomainResult<()> {
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }
    }

    #[derive(Default)]
    struct OneUser {
        user: Option<User>,
        profile_calls: AtomicUsize,
    }

    #[async_trait]
    impl ReadModelRepository for OneUser {
        async fn find_by_id(&self, id: &str, _c: &CancellationToken) -> DomainResult<Option<User>> {
            Ok(self.user.clone().filter(|u| u.id() == id))
        }

        async fn find_by_email(
            &self,
            email: &str,
            _c: &CancellationToken,
        ) -> DomainResult<Option<User>> {
            Ok(self.user.clone().filter(|u| u.email() == email))
        }

        async fn find_by_username(
            &self,
            username: &str,
            _c: &CancellationToken,
        ) -> DomainResult<Option<User>> {
            Ok(self.user.clone().filter(|u| u.username() == Some(username)))
        }

        async fn get_profile(
            &self,
            profile_id: &str,
            _c: &CancellationToken,
        ) -> DomainResult<Option<Profile>> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Profile::builder().id(profile_id).display_name("Alice").build()))
        }

        async fn get_user_roles(
            &self,
            _user_id: &str,
            _c: &CancellationToken,
        ) -> DomainResult<Vec<Role>> {
            Ok(vec![Role::from("buyer")])
        }
    }

    fn query(criteria: UserCriteria, options: QueryOptions) -> GetUserQuery {
        GetUserQuery::new(criteria, options, &SequentialQueryIdGenerator::new("t"))
    }

    #[test]
    fn flight_key_distinguishes_options() {
        let plain = flight_key("user:id:u1", QueryOptions::default());
        let roles = flight_key(
            "user:id:u1",
            QueryOptions::builder().include_roles(true).build(),
        );
        assert_eq!(plain, "user:id:u1#00");
        assert_eq!(roles, "user:id:u1#01");
    }

    #[tokio::test]
    async fn corrupt_cache_entry_falls_back_to_repository() {
        let cache = Arc::new(MapCache::default());
        cache
            .entries
            .lock()
            .unwrap()
            .insert("user:id:u1".into(), json!({"garbage": true}));
        let repo = Arc::new(OneUser {
            user: Some(User::builder().id("u1").email("a@b.com").build()),
            ..Default::default()
        });
        let handler = GetUserQueryHandler::builder()
            .repository(repo)
            .cache(cache.clone())
            .build();

        let env = handler
            .handle(
                &AppContext::default(),
                query(UserCriteria::builder().id("u1").build(), QueryOptions::default()),
            )
            .await;

        assert!(env.is_success());
        assert!(!env.from_cache());
        assert_eq!(cache.entries.lock().unwrap()["user:id:u1"]["id"], json!("u1"));
    }

    #[tokio::test]
    async fn profile_reference_absent_skips_fetch() {
        let repo = Arc::new(OneUser {
            user: Some(User::builder().id("u1").email("a@b.com").build()),
            ..Default::default()
        });
        let handler = GetUserQueryHandler::builder()
            .repository(repo.clone())
            .cache(Arc::new(MapCache::default()))
            .build();

        let env = handler
            .handle(
                &AppContext::default(),
                query(
                    UserCriteria::builder().id("u1").build(),
                    QueryOptions::builder().include_profile(true).build(),
                ),
            )
            .await;

        assert!(env.is_success());
        assert!(env.data().unwrap().profile.is_none());
        assert_eq!(repo.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cache_failure_becomes_infrastructure_envelope() {
        let handler = GetUserQueryHandler::builder()
            .repository(Arc::new(OneUser::default()))
            .cache(Arc::new(MapCache {
                fail_get: true,
                ..Default::default()
            }))
            .build();

        let env = handler
            .handle(
                &AppContext::default(),
                query(UserCriteria::builder().email("a@b.com").build(), QueryOptions::default()),
            )
            .await;

        assert!(!env.is_success());
        assert_eq!(env.error_kind(), Some(ErrorKind::Infrastructure));
        assert_eq!(env.error(), Some("domain: cache error: connection refused"));
        assert_eq!(env.query_id(), "t-1");
    }

    #[tokio::test]
    async fn custom_prefix_is_used_for_keys() {
        let cache = Arc::new(MapCache::default());
        let handler = GetUserQueryHandler::builder()
            .repository(Arc::new(OneUser {
                user: Some(User::builder().id("u1").email("a@b.com").username("alice").build()),
                ..Default::default()
            }))
            .cache(cache.clone())
            .config(UserQueryConfig::builder().cache_key_prefix("acct").build())
            .build();

        let env = handler
            .handle(
                &AppContext::default(),
                query(UserCriteria::builder().username("alice").build(), QueryOptions::default()),
            )
            .await;

        assert!(env.is_success());
        assert!(cache.entries.lock().unwrap().contains_key("acct:username:alice"));
    }
}
