//! 按候选键获取用户（GetUser）
//!
//! 查询可以通过 id、email、username 中的任意一个（或多个）标识用户，
//! 处理器按固定优先级 id > email > username 选出唯一生效的条件，
//! 先查缓存，未命中时回源读模型，按需加载资料与角色后回填缓存。
//!
//! ```text
//! validate ─▶ cache key ─▶ cache.get ──hit──▶ envelope(from_cache)
//!                               │
//!                              miss
//!                               ▼
//!               single-flight ─▶ repository.find_by_* ─▶ projection
//!                               ─▶ profile / roles ─▶ cache.set(ttl) ─▶ envelope
//! ```
mod cache_key;
mod criteria;
mod handler;
mod query;
mod view;

pub use cache_key::cache_key;
pub use criteria::{Criterion, CriterionKind, UserCriteria};
pub use handler::GetUserQueryHandler;
pub use query::{GetUserQuery, QueryOptions};
pub use view::UserView;
