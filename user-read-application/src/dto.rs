use serde::Serialize;

/// 数据传输对象（DTO）
///
/// - 作为应用层的输出载体，面向接口/外部系统序列化友好；
/// - 与读模型记录解耦，避免将内部字段直接暴露到接口层；
/// - 应保持只读特性与简洁结构。
pub trait Dto: Serialize + Clone + Send + Sync + 'static {}
