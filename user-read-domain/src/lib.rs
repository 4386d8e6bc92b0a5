//! 用户读侧领域层（user-read-domain）
//!
//! 提供 CQRS 读模型所需的最小领域构件：
//! - 读模型记录（`read_model`）：`User`、`Profile`、`Role`
//! - 读模型仓储协议（`ReadModelRepository`），按 id / email / username 查找用户，
//!   并支持按需加载资料与角色
//! - 统一错误类型（`error`）
//!
//! 本 crate 只定义协议与数据形状，具体存储后端由上层提供实现并注入；
//! 启用 `inmemory` 特性时附带一个基于内存的读模型实现，便于测试与演示。
//!
pub mod error;
pub mod read_model;
