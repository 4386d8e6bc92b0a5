use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use user_read_application::cache::InMemoryCache;
use user_read_application::config::UserQueryConfig;
use user_read_application::context::AppContext;
use user_read_application::get_user::{
    GetUserQuery, GetUserQueryHandler, QueryOptions, UserCriteria,
};
use user_read_application::query_handler::QueryHandler;
use user_read_application::query_id::{QueryIdGenerator, UlidQueryIdGenerator};
use user_read_domain::read_model::{InMemoryReadModel, Profile, Role, User};

fn seed(store: &InMemoryReadModel) {
    store.upsert_user(
        User::builder()
            .id("u1")
            .email("alice@example.com")
            .username("alice")
            .password_hash("$argon2id$v=19$not-for-output")
            .is_active(true)
            .profile_id("p1")
            .created_at(Utc::now())
            .build(),
    );
    store.upsert_profile(
        Profile::builder()
            .id("p1")
            .display_name("Alice")
            .bio("Early adopter")
            .build(),
    );
    store.set_roles("u1", vec![Role::from("buyer")]);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,user_read_application=debug")),
        )
        .init();

    let config = UserQueryConfig::from_env()?;
    tracing::info!(?config, "loaded configuration");

    let store = Arc::new(InMemoryReadModel::new());
    seed(&store);

    let handler = GetUserQueryHandler::builder()
        .repository(store)
        .cache(Arc::new(InMemoryCache::new(config.cache_max_capacity)))
        .config(config)
        .build();
    let ids = UlidQueryIdGenerator::new();
    let ctx = AppContext::builder()
        .correlation_id(ids.next_id())
        .build()
        .with_timeout(Duration::from_secs(2));

    let everything = QueryOptions::builder()
        .include_profile(true)
        .include_roles(true)
        .build();

    // 冷缓存 -> 回源；随后同一查询命中缓存
    for criteria in [
        UserCriteria::builder().id("u1").build(),
        UserCriteria::builder().id("u1").build(),
        UserCriteria::builder().email("alice@example.com").build(),
        UserCriteria::builder().username("nobody").build(),
        UserCriteria::default(),
    ] {
        let env = handler
            .handle(&ctx, GetUserQuery::new(criteria, everything, &ids))
            .await;
        println!("{}", serde_json::to_string_pretty(&env)?);
    }

    Ok(())
}
