use crate::{context::AppContext, envelope::QueryEnvelope, query::Query};
use async_trait::async_trait;

/// 查询处理器
///
/// 约定“一个信封，永远返回”：处理过程中的任何失败都以失败信封表达，
/// 不向调用方传播错误。
#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, ctx: &AppContext, q: Q) -> QueryEnvelope<Q::Dto>;
}
