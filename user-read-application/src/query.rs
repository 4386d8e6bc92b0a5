use crate::dto::Dto;

/// 应用层查询（Query）
///
/// 表达只读意图，不改变领域状态。
/// - 结果以 [`QueryEnvelope`](crate::envelope::QueryEnvelope) 包裹的 [`Dto`] 返回；
/// - 查询值在构造时分配关联 id，之后不可变，一次处理后即丢弃；
/// - 可按 CQRS 将写/读分离，查询直连读模型或其缓存。
pub trait Query: Send + Sync + 'static {
    /// 查询的稳定名称（建议常量字符串，不随重构变化），用于日志与追踪
    const NAME: &'static str;

    /// 查询返回的数据传输对象
    type Dto: Dto;

    /// 构造时分配的关联 id，仅用于信封回显与日志，不可作为缓存或存储键
    fn query_id(&self) -> &str;
}
