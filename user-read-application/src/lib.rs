//! 用户读侧应用层（user-read-application）
//!
//! 以 CQRS 读侧为中心的查询编排：
//! - 查询与处理器协议（`query`、`query_handler`），处理结果统一包裹为 `QueryEnvelope`
//! - 调用上下文（`context`）：关联 id、取消令牌与截止时间
//! - 缓存协议与内存实现（`cache`）、在途请求合并（`single_flight`）
//! - 具体用例：按 id / email / username 获取用户（`get_user`）
//!
//! 典型用法：
//! 1. 提供 `ReadModelRepository` 与 `CacheService` 的实现；
//! 2. 通过 `GetUserQueryHandler::builder()` 装配处理器（可注入 `UserQueryConfig`）；
//! 3. 用 `QueryIdGenerator` 构造 `GetUserQuery`，交给处理器 `handle`，读取信封。
//!
pub mod cache;
pub mod config;
pub mod context;
pub mod dto;
pub mod envelope;
pub mod error;
pub mod get_user;
pub mod query;
pub mod query_handler;
pub mod query_id;
pub mod single_flight;

pub use envelope::QueryEnvelope;
pub use get_user::{GetUserQuery, GetUserQueryHandler};
